use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use super::{parse_organization, UserResponse};
use crate::app::{
    db::{self, NewUser, UserChanges},
    domain::{Email, OrganizationId, UserId},
    error::AppError,
    session::ApiAdminSession,
    AppState,
};

/// Request body for adding a person.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub email: String,
    pub organization_id: String,
    #[validate(length(max = 100))]
    pub job_function: Option<String>,
    #[serde(default)]
    pub is_leader: bool,
    #[serde(default)]
    pub is_admin: bool,
}

/// Request body for editing a person (partial update).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub email: Option<String>,
    pub organization_id: Option<String>,
    #[validate(length(max = 100))]
    pub job_function: Option<String>,
    pub is_leader: Option<bool>,
    pub is_admin: Option<bool>,
}

fn parse_email(raw: String) -> Result<Email, AppError> {
    Email::new(raw).map_err(|_| AppError::Validation("Invalid email".to_string()))
}

fn non_blank(name: String) -> Result<String, AppError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(name)
}

async fn existing_organization(state: &AppState, raw: &str) -> Result<OrganizationId, AppError> {
    let org_id = parse_organization(raw)?;
    db::organizations::find_by_id(&state.db, &org_id)
        .await?
        .ok_or_else(|| AppError::Validation("Organization does not exist".to_string()))?;
    Ok(org_id)
}

fn duplicate_email(err: sqlx::Error) -> AppError {
    if db::users::is_duplicate_email(&err) {
        AppError::Validation("Email already exists".to_string())
    } else {
        AppError::Database(err)
    }
}

async fn load(state: &AppState, user_id: &str) -> Result<UserResponse, AppError> {
    db::users::find_by_id(&state.db, user_id)
        .await?
        .map(UserResponse::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// POST /api/users — Admin only.
pub async fn create(
    ApiAdminSession(admin): ApiAdminSession,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation("Invalid input".to_string()))?;
    let name = non_blank(request.name)?;
    let email = parse_email(request.email)?;
    let organization_id = existing_organization(&state, &request.organization_id).await?;

    let new_user = NewUser {
        id: UserId::new(),
        organization_id,
        name,
        email,
        job_function: request.job_function.filter(|j| !j.trim().is_empty()),
        is_leader: request.is_leader,
        is_admin: request.is_admin,
    };
    db::users::insert(&state.db, &new_user)
        .await
        .map_err(duplicate_email)?;

    let user_id = new_user.id.as_str();
    tracing::info!(%user_id, admin_id = %admin.user_id, "user created");

    Ok((StatusCode::CREATED, Json(load(&state, &user_id).await?)))
}

/// PATCH /api/users/:user_id — Admin only.
pub async fn update(
    ApiAdminSession(admin): ApiAdminSession,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation("Invalid input".to_string()))?;

    let organization_id = match request.organization_id.as_deref() {
        Some(raw) => Some(existing_organization(&state, raw).await?),
        None => None,
    };
    let changes = UserChanges {
        organization_id,
        name: request.name.map(non_blank).transpose()?,
        email: request.email.map(parse_email).transpose()?,
        job_function: request.job_function,
        is_leader: request.is_leader,
        is_admin: request.is_admin,
    };

    let found = db::users::update(&state.db, &user_id, &changes)
        .await
        .map_err(duplicate_email)?;
    if !found {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    tracing::info!(%user_id, admin_id = %admin.user_id, "user updated");

    Ok(Json(load(&state, &user_id).await?))
}

/// DELETE /api/users/:user_id — Admin only. Administrators cannot remove themselves.
pub async fn delete(
    ApiAdminSession(admin): ApiAdminSession,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if user_id == admin.user_id {
        return Err(AppError::Validation("Cannot delete yourself".to_string()));
    }
    if !db::users::delete(&state.db, &user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    tracing::info!(%user_id, admin_id = %admin.user_id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/:user_id/leader — Admin only. Flips the leader flag.
pub async fn toggle_leader(
    ApiAdminSession(admin): ApiAdminSession,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    if !db::users::toggle_leader(&state.db, &user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    let user = load(&state, &user_id).await?;
    tracing::info!(%user_id, is_leader = user.is_leader, admin_id = %admin.user_id, "leader flag toggled");

    Ok(Json(user))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/users/:user_id/leader", post(toggle_leader))
}
