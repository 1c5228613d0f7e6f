use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use super::{create::validate_key_results, GoalResponse};
use crate::app::{
    db::{self, goals::GoalChanges},
    domain::{GoalStatus, GoalVisibility},
    error::AppError,
    rbac::Action,
    session::ApiAuthenticatedSession,
    tenant, AppState,
};

/// Request body for updating a goal (partial update).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_key_results"))]
    pub key_results: Option<Vec<String>>,
    pub status: Option<GoalStatus>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i64>,
    pub visibility: Option<GoalVisibility>,
}

/// GET /api/goals/:goal_id
pub async fn show(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
) -> Result<Json<GoalResponse>, AppError> {
    let goal = tenant::find_readable_goal(&state, &session, &goal_id).await?;
    Ok(Json(GoalResponse::from(goal)))
}

/// PATCH /api/goals/:goal_id
pub async fn update(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
    Json(request): Json<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation("Invalid input".to_string()))?;
    let title = request.title.map(|t| t.trim().to_string());
    if title.as_deref().is_some_and(str::is_empty) {
        return Err(AppError::Validation("Invalid input".to_string()));
    }

    let goal = tenant::find_readable_goal(&state, &session, &goal_id).await?;
    tenant::require_goal_action(&state, &session, &goal, Action::GoalUpdate).await?;

    let changes = GoalChanges {
        title,
        description: request.description,
        key_results: request.key_results,
        status: request.status,
        progress: request.progress,
        visibility: request.visibility,
    };
    db::goals::update(&state.db, &goal.id, &changes).await?;

    let updated = db::goals::find_by_id(&state.db, &goal.id)
        .await?
        .ok_or(AppError::Internal)?;
    Ok(Json(GoalResponse::from(updated)))
}

/// DELETE /api/goals/:goal_id — Removes the goal and its comments.
pub async fn delete(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let goal = tenant::find_readable_goal(&state, &session, &goal_id).await?;
    tenant::require_goal_action(&state, &session, &goal, Action::GoalDelete).await?;

    db::goals::delete(&state.db, &goal.id).await?;
    tracing::info!(goal_id = %goal.id, user_id = %session.user_id, "goal deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/goals/:goal_id", get(show).patch(update).delete(delete))
}
