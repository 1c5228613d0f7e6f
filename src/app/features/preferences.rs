use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::app::{
    db::{
        self,
        preferences::{PreferenceChanges, Preferences},
    },
    domain::{GoalVisibility, Theme},
    error::AppError,
    session::ApiAuthenticatedSession,
    AppState,
};

/// Request body for changing preferences. Omitted fields stay as they are.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<Theme>,
    pub default_goal_visibility: Option<GoalVisibility>,
    pub notifications_enabled: Option<bool>,
    #[validate(length(min = 2, max = 35))]
    pub locale: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,
}

/// GET /api/me/preferences
pub async fn show(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
) -> Result<Json<Preferences>, AppError> {
    let preferences = db::preferences::find_for_user(&state.db, &session.user_id).await?;
    Ok(Json(preferences))
}

/// PATCH /api/me/preferences
pub async fn update(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<Preferences>, AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation("Invalid input".to_string()))?;

    let changes = PreferenceChanges {
        theme: request.theme,
        default_goal_visibility: request.default_goal_visibility,
        notifications_enabled: request.notifications_enabled,
        locale: request.locale.map(|l| l.trim().to_string()),
        timezone: request.timezone.map(|t| t.trim().to_string()),
    };

    let mut tx = state.db.begin().await?;
    let current = db::preferences::find_for_user(&mut *tx, &session.user_id).await?;
    db::preferences::upsert(&mut *tx, &session.user_id, &current, &changes).await?;
    let updated = db::preferences::find_for_user(&mut *tx, &session.user_id).await?;
    tx.commit().await?;

    Ok(Json(updated))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/me/preferences", get(show).patch(update))
}
