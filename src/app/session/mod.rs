use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::app::{config::Config, db, domain::OrganizationId, error::AppError, AppState};

/// Name of the cookie carrying the raw session token.
pub const SESSION_COOKIE: &str = "northstar_session";

pub fn session_cookie(token: impl Into<String>, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.into()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::days(config.session_ttl_days))
        .path("/")
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .removal()
        .into()
}

/// The caller behind a valid session. The organization is re-read from the
/// users table on every request, so moving a user takes effect immediately.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
    pub organization_id: OrganizationId,
    pub is_admin: bool,
}

/// Extractor for JSON API routes. Rejects with 401 `{"error":"Unauthorized"}`
/// when the cookie is missing, expired, or points at a deleted user.
pub struct ApiAuthenticatedSession(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for ApiAuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let session = db::sessions::find_valid(&state.db, &token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let user = db::users::find_by_id(&state.db, &session.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        let organization_id = user.organization_id()?;

        Ok(Self(SessionUser {
            user_id: user.id,
            organization_id,
            is_admin: user.is_admin,
        }))
    }
}

/// Extractor for personnel management. Authenticated like
/// [`ApiAuthenticatedSession`], then 403 unless the user is an administrator.
pub struct ApiAdminSession(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for ApiAdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ApiAuthenticatedSession(user) = ApiAuthenticatedSession::from_request_parts(parts, state).await?;
        if !user.is_admin {
            tracing::warn!(user_id = %user.user_id, "non-admin attempted personnel management");
            return Err(AppError::Forbidden);
        }
        Ok(Self(user))
    }
}
