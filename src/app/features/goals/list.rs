use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::GoalResponse;
use crate::app::{
    db,
    error::AppError,
    rbac::{goal_visible_to, Action},
    session::ApiAuthenticatedSession,
    tenant, AppState,
};

/// GET /api/organizations/:org_id/goals — Newest first. Callers from other
/// organizations do not see private goals.
pub async fn list(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<Vec<GoalResponse>>, AppError> {
    let org_id = tenant::parse_org_id(&org_id)?;
    let decision = tenant::require_action(&state, &session, &org_id, Action::GoalRead).await?;

    let goals = db::goals::find_by_organization(&state.db, &org_id)
        .await?
        .into_iter()
        .filter(|g| goal_visible_to(decision.relationship, g.visibility))
        .map(GoalResponse::from)
        .collect();

    Ok(Json(goals))
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/organizations/:org_id/goals",
        get(list).post(super::create::create),
    )
}
