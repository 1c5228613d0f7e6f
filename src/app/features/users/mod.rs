mod directory;
mod manage;

use axum::Router;
use serde::Serialize;

use crate::app::{db::User, domain::OrganizationId, error::AppError, AppState};

/// A user as returned by the JSON API.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub email: String,
    pub job_function: Option<String>,
    pub is_leader: bool,
    pub is_admin: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            organization_id: user.organization_id,
            name: user.name,
            email: user.email,
            job_function: user.job_function,
            is_leader: user.is_leader,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Parse an organization id from a request body or query. Malformed ids are
/// input errors here rather than tenant lookups.
fn parse_organization(raw: &str) -> Result<OrganizationId, AppError> {
    OrganizationId::from_string(raw.trim())
        .map_err(|_| AppError::Validation("Invalid organization".to_string()))
}

/// User routes (directory, personnel management).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(directory::routes())
        .merge(manage::routes())
}
