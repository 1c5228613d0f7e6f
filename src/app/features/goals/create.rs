use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use ulid::Ulid;
use validator::{Validate, ValidationError};

use super::GoalResponse;
use crate::app::{
    db::{self, goals::NewGoal},
    domain::{GoalStatus, GoalVisibility},
    error::AppError,
    rbac::Action,
    session::ApiAuthenticatedSession,
    tenant, AppState,
};

/// Max key results per goal.
pub const MAX_KEY_RESULTS: usize = 20;

/// Validates a key-results list: bounded count, each entry 1-500 chars.
pub fn validate_key_results(key_results: &[String]) -> Result<(), ValidationError> {
    if key_results.len() > MAX_KEY_RESULTS
        || key_results
            .iter()
            .any(|kr| kr.trim().is_empty() || kr.chars().count() > 500)
    {
        return Err(ValidationError::new("key_results")
            .with_message(Cow::Borrowed("at most 20 non-empty entries of up to 500 characters")));
    }
    Ok(())
}

/// Request body for creating a goal.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_key_results"))]
    pub key_results: Vec<String>,
    pub status: Option<GoalStatus>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i64>,
    pub visibility: Option<GoalVisibility>,
}

/// POST /api/organizations/:org_id/goals — Create a goal owned by the organization.
pub async fn create(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
    Json(request): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::Validation("Invalid input".to_string()))?;
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Invalid input".to_string()));
    }

    let org_id = tenant::parse_org_id(&org_id)?;
    tenant::require_action(&state, &session, &org_id, Action::GoalCreate).await?;

    let visibility = match request.visibility {
        Some(visibility) => visibility,
        None => {
            db::preferences::find_for_user(&state.db, &session.user_id)
                .await?
                .default_goal_visibility
        }
    };

    let goal_id = Ulid::new().to_string();
    let new_goal = NewGoal {
        id: goal_id.clone(),
        organization_id: org_id,
        owner_id: Some(session.user_id.clone()),
        title: request.title.trim().to_string(),
        description: request.description,
        key_results: request.key_results,
        status: request.status.unwrap_or_default(),
        progress: request.progress.unwrap_or(0),
        visibility,
    };
    db::goals::insert(&state.db, &new_goal).await?;

    let goal = db::goals::find_by_id(&state.db, &goal_id)
        .await?
        .ok_or(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(GoalResponse::from(goal))))
}
