use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use validator::Validate;

use crate::app::{
    db,
    domain::{Email, UserId},
    error::AppError,
    session::session_cookie,
    AppState,
};

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub organization_id: String,
    pub name: String,
}

/// Start a session for the user with this email. Returns the raw session token.
async fn authenticate(
    state: &AppState,
    email: &Email,
) -> Result<(String, db::User), AppError> {
    let user = db::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| AppError::Auth("Unknown email".to_string()))?;

    let user_id = UserId::from_string(&user.id).map_err(|_| AppError::Internal)?;

    let expires_at = OffsetDateTime::now_utc() + Duration::days(state.config.session_ttl_days);
    let token = db::sessions::create(&state.db, &user_id, expires_at).await?;

    Ok((token, user))
}

/// POST /login — Sign in by email.
pub async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation("Invalid input".to_string()))?;

    let email = Email::new(request.email)
        .map_err(|_| AppError::Validation("Invalid email".to_string()))?;

    let (token, user) = authenticate(&state, &email).await?;
    tracing::info!(user_id = %user.id, "user signed in");

    let jar = jar.add(session_cookie(token, &state.config));
    Ok((
        jar,
        Json(LoginResponse {
            user_id: user.id,
            organization_id: user.organization_id,
            name: user.name,
        }),
    ))
}

/// Login routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(submit))
}
