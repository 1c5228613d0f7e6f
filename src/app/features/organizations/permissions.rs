use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::app::{
    error::AppError,
    rbac::{allowed_actions, Action, Decision, OrgRelationship},
    session::ApiAuthenticatedSession,
    tenant, AppState,
};

#[derive(Debug, Deserialize)]
pub struct PermissionsQuery {
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PermissionsResponse {
    Check(Decision),
    Summary {
        relationship: OrgRelationship,
        allowed_actions: Vec<Action>,
    },
}

/// GET /api/organizations/:org_id/permissions — What the caller may do in the
/// organization, or a single `?action=resource:verb` check. Callers that cannot
/// read the organization get 403 either way.
pub async fn permissions(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
    Query(query): Query<PermissionsQuery>,
) -> Result<Json<PermissionsResponse>, AppError> {
    let action = query
        .action
        .as_deref()
        .map(|tag| {
            tag.parse::<Action>()
                .map_err(|_| AppError::Validation(format!("Unknown action: {tag}")))
        })
        .transpose()?;

    let org_id = tenant::parse_org_id(&org_id)?;
    let read = tenant::require_action(&state, &session, &org_id, Action::OrganizationRead).await?;

    let response = match action {
        Some(action) => PermissionsResponse::Check(
            state
                .gate
                .decide(&session.organization_id, &org_id, action)
                .await?,
        ),
        None => PermissionsResponse::Summary {
            relationship: read.relationship,
            allowed_actions: allowed_actions(read.relationship).to_vec(),
        },
    };
    Ok(Json(response))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations/:org_id/permissions", get(permissions))
}
