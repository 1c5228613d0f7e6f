use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::app::{
    agent::{self, Caller, ToolError},
    error::AppError,
    session::{ApiAuthenticatedSession, SessionUser},
    AppState,
};

/// Tool failures over HTTP. Permission denials keep the tool's message, which
/// names the relationship; everything else maps like any other API error.
pub struct AgentError(ToolError);

impl From<ToolError> for AgentError {
    fn from(err: ToolError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        match self.0.relationship() {
            Some(relationship) => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": self.0.to_string(), "relationship": relationship })),
            )
                .into_response(),
            None => AppError::from(self.0).into_response(),
        }
    }
}

async fn caller_for(state: &AppState, session: &SessionUser) -> Result<Caller, ToolError> {
    agent::resolve_caller(&state.db, Some(&session.user_id)).await
}

#[derive(Debug, Deserialize)]
pub struct ContextQuery {
    pub format: Option<String>,
}

/// GET /api/agent/context — JSON by default, `?format=markdown` for the briefing text.
pub async fn context(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Query(query): Query<ContextQuery>,
) -> Result<Response, AgentError> {
    let caller = caller_for(&state, &session).await?;
    let context = agent::build_user_context(&state, &caller).await?;

    if query.format.as_deref() == Some("markdown") {
        return Ok((
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            context.to_markdown(),
        )
            .into_response());
    }
    Ok(Json(context).into_response())
}

/// GET /api/agent/parent-goals/:org_id
pub async fn parent_goals(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<Vec<agent::ParentGoals>>, AgentError> {
    let caller = caller_for(&state, &session).await?;
    Ok(Json(agent::get_parent_goals(&state, &caller, &org_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

/// GET /api/agent/collaborator-goals?keyword=
pub async fn collaborator_goals(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<agent::CollaboratorGoal>>, AgentError> {
    let caller = caller_for(&state, &session).await?;
    Ok(Json(
        agent::search_collaborator_goals(&state, &caller, &query.keyword).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuestionRequest {
    pub goal_id: String,
    pub question: String,
}

/// POST /api/agent/questions
pub async fn submit_question(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Json(request): Json<SubmitQuestionRequest>,
) -> Result<(StatusCode, Json<agent::SubmittedQuestion>), AgentError> {
    let caller = caller_for(&state, &session).await?;
    let submitted =
        agent::submit_question(&state, &caller, &request.goal_id, &request.question).await?;
    Ok((StatusCode::CREATED, Json(submitted)))
}

/// Agent tool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/agent/context", get(context))
        .route("/api/agent/parent-goals/:org_id", get(parent_goals))
        .route("/api/agent/collaborator-goals", get(collaborator_goals))
        .route("/api/agent/questions", post(submit_question))
}
