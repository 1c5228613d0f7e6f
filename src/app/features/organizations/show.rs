use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::OrganizationResponse;
use crate::app::{
    db::{self, organizations::OrganizationChanges},
    error::AppError,
    rbac::Action,
    session::ApiAuthenticatedSession,
    tenant, AppState,
};

/// Request body for updating an organization (partial update).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 10000))]
    pub ai_guidelines: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PathEntry {
    pub id: String,
    pub name: String,
}

/// GET /api/organizations/:org_id
pub async fn show(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<OrganizationResponse>, AppError> {
    let org_id = tenant::parse_org_id(&org_id)?;
    let decision = tenant::require_action(&state, &session, &org_id, Action::OrganizationRead).await?;

    let org = state.orgs.require(&org_id).await?;
    Ok(Json(OrganizationResponse::new(org, decision.relationship)))
}

/// PATCH /api/organizations/:org_id — Only members of the organization itself may edit it.
pub async fn update(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
    Json(request): Json<UpdateOrganizationRequest>,
) -> Result<Json<OrganizationResponse>, AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation("Invalid input".to_string()))?;

    let org_id = tenant::parse_org_id(&org_id)?;
    let decision =
        tenant::require_action(&state, &session, &org_id, Action::OrganizationUpdate).await?;

    let changes = OrganizationChanges {
        name: request.name.map(|n| n.trim().to_string()),
        description: request.description,
        ai_guidelines: request.ai_guidelines,
    };
    if !db::organizations::update(&state.db, &org_id, &changes).await? {
        return Err(AppError::NotFound("Organization not found".to_string()));
    }
    tracing::info!(org_id = %org_id, user_id = %session.user_id, "organization updated");

    let org = state.orgs.require(&org_id).await?;
    Ok(Json(OrganizationResponse::new(org, decision.relationship)))
}

/// GET /api/organizations/:org_id/path — Root-first chain ending at the organization.
pub async fn path(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<Vec<PathEntry>>, AppError> {
    let org_id = tenant::parse_org_id(&org_id)?;
    tenant::require_action(&state, &session, &org_id, Action::OrganizationRead).await?;

    let path = state
        .orgs
        .get_path(&org_id)
        .await?
        .into_iter()
        .map(|o| PathEntry {
            id: o.id.as_str(),
            name: o.name,
        })
        .collect();
    Ok(Json(path))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/organizations/:org_id", get(show).patch(update))
        .route("/api/organizations/:org_id/path", get(path))
}
