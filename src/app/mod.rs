use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use crate::app::config::Config;
use crate::app::rbac::{AccessScopeCalculator, AuthorizationGate, SharedOrgStore, SqliteOrgStore};

/// Human-readable application name.
pub const APP_NAME: &str = "NorthStar";

/// Shared state available to all handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub orgs: SharedOrgStore,
    pub gate: AuthorizationGate,
    pub scope: AccessScopeCalculator,
}

impl AppState {
    /// Wire the access-control engine to the database-backed org store.
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let orgs: SharedOrgStore = Arc::new(
            SqliteOrgStore::new(db.clone()).with_max_depth(config.org_tree_max_depth),
        );
        Self {
            gate: AuthorizationGate::new(orgs.clone()),
            scope: AccessScopeCalculator::new(orgs.clone()),
            orgs,
            db,
            config,
        }
    }
}

/// App routes (auth, organizations, goals, comments, agent, users, preferences).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(features::auth::routes())
        .merge(features::organizations::routes())
        .merge(features::goals::routes())
        .merge(features::comments::routes())
        .merge(features::agent::routes())
        .merge(features::users::routes())
        .merge(features::preferences::routes())
}

pub mod agent;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod features;
pub mod rbac;
pub mod session;
pub mod tenant;
