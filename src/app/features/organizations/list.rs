use axum::{extract::State, routing::get, Json, Router};

use super::{CallerTree, OrganizationResponse};
use crate::app::{
    error::AppError,
    rbac::{has_permission, Action},
    session::ApiAuthenticatedSession,
    AppState,
};

/// GET /api/organizations — Organizations the caller may read, with the caller's relationship to each.
pub async fn list(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationResponse>>, AppError> {
    let Some(tree) = CallerTree::load(&state, &session.organization_id).await? else {
        return Ok(Json(Vec::new()));
    };

    let mut visible: Vec<OrganizationResponse> = Vec::new();
    for org in tree.members.iter().cloned() {
        let relationship = tree.relationship(&org.id);
        if has_permission(relationship, Action::OrganizationRead) {
            visible.push(OrganizationResponse::new(org, relationship));
        }
    }
    visible.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    Ok(Json(visible))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations", get(list))
}
