use axum::{extract::State, http::StatusCode, routing::post, Router};
use axum_extra::extract::cookie::CookieJar;

use crate::app::{db, error::AppError, session, AppState};

/// POST /logout — End the current session. Succeeds without a session too.
pub async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    if let Some(cookie) = jar.get(session::SESSION_COOKIE) {
        db::sessions::delete_by_token(&state.db, cookie.value()).await?;
    }

    let jar = jar.add(session::clear_session_cookie());
    Ok((jar, StatusCode::NO_CONTENT))
}

/// Logout routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/logout", post(submit))
}
