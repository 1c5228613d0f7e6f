mod create;
mod list;
mod show;

use axum::Router;
use serde::Serialize;

use crate::app::{
    db::goals::Goal,
    domain::{GoalStatus, GoalVisibility},
    AppState,
};

/// Goal as returned by the JSON API.
#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub id: String,
    pub organization_id: String,
    pub owner_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub key_results: Vec<String>,
    pub status: GoalStatus,
    pub progress: i64,
    pub visibility: GoalVisibility,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        let key_results = goal.key_results_list();
        Self {
            id: goal.id,
            organization_id: goal.organization_id,
            owner_id: goal.owner_id,
            title: goal.title,
            description: goal.description,
            key_results,
            status: goal.status,
            progress: goal.progress,
            visibility: goal.visibility,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

/// Goal routes (list, create, show, update, delete).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(list::routes())
        .merge(show::routes())
}
