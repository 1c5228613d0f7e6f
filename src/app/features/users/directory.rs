use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{manage, parse_organization, UserResponse};
use crate::app::{db, error::AppError, session::ApiAuthenticatedSession, AppState};

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    pub organization_id: Option<String>,
}

/// GET /api/users — Company directory, optionally narrowed to one organization.
pub async fn list(
    ApiAuthenticatedSession(_session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = match query.organization_id.as_deref() {
        Some(raw) => {
            let org_id = parse_organization(raw)?;
            db::users::find_by_organization(&state.db, &org_id).await?
        }
        None => db::users::list_all(&state.db).await?,
    };

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/:user_id
pub async fn show(
    ApiAuthenticatedSession(_session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = db::users::find_by_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list).post(manage::create))
        .route(
            "/api/users/:user_id",
            get(show).patch(manage::update).delete(manage::delete),
        )
}
