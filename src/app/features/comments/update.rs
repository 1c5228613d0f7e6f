use axum::{
    extract::{Path, State},
    routing::patch,
    Json, Router,
};
use serde::Deserialize;

use crate::app::{
    db::{self, comments::Comment},
    domain::CommentStatus,
    error::AppError,
    rbac::Action,
    session::ApiAuthenticatedSession,
    tenant, AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub status: CommentStatus,
}

/// PATCH /api/comments/:comment_id — Move a comment through its workflow.
/// Needs `comment:respond` on the goal's organization.
pub async fn update(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    let comment = db::comments::find_by_id(&state.db, &comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    let goal = tenant::find_readable_goal(&state, &session, &comment.goal_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Comment not found".to_string()),
            other => other,
        })?;
    tenant::require_goal_action(&state, &session, &goal, Action::CommentRespond).await?;

    db::comments::update_status(&state.db, &comment.id, request.status).await?;

    let updated = db::comments::find_by_id(&state.db, &comment.id)
        .await?
        .ok_or(AppError::Internal)?;
    Ok(Json(updated))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/comments/:comment_id", patch(update))
}
