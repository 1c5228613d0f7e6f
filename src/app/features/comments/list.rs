use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::app::{
    db::{self, comments::{Comment, NewComment}},
    domain::CommentKind,
    error::AppError,
    rbac::Action,
    session::ApiAuthenticatedSession,
    tenant, AppState,
};

/// Request body for posting a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    pub kind: CommentKind,
}

/// GET /api/goals/:goal_id/comments — Oldest first.
pub async fn list(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let goal = tenant::find_readable_goal(&state, &session, &goal_id).await?;
    tenant::require_goal_action(&state, &session, &goal, Action::CommentRead).await?;

    let comments = db::comments::find_by_goal(&state.db, &goal.id).await?;
    Ok(Json(comments))
}

/// POST /api/goals/:goal_id/comments — The comment kind decides which action is checked.
pub async fn create(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation("Invalid input".to_string()))?;
    let content = request.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Invalid input".to_string()));
    }

    let goal = tenant::find_readable_goal(&state, &session, &goal_id).await?;
    tenant::require_goal_action(&state, &session, &goal, super::action_for_kind(request.kind))
        .await?;

    let new_comment = NewComment {
        id: Ulid::new().to_string(),
        goal_id: goal.id,
        author_id: session.user_id,
        content: content.to_string(),
        kind: request.kind,
        status: request.kind.initial_status(),
    };
    db::comments::insert(&state.db, &new_comment).await?;

    let comment = db::comments::find_by_id(&state.db, &new_comment.id)
        .await?
        .ok_or(AppError::Internal)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/goals/:goal_id/comments", get(list).post(create))
}
