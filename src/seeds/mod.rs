//! Versioned data seeds. Unlike migrations they are optional and driven by
//! env vars: a seed that declines to run stays pending and is retried on the
//! next startup. Applied versions live in `_northstar_seeds`.

mod admin_user;
mod demo_organizations;

use async_trait::async_trait;
use sqlx::{SqliteExecutor, SqlitePool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Applied,
    /// Not recorded. Carries the reason for the operator.
    Skipped(&'static str),
}

#[async_trait]
pub trait Seed: Send + Sync {
    /// `YYYYMMDDHHMMSS`. Also the execution order.
    fn version(&self) -> i64;

    fn name(&self) -> &'static str;

    /// Must be safe to re-run after `forget_seed`.
    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error>;
}

/// Which seeds a run considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedSelection {
    /// Only versions not yet recorded.
    #[default]
    Pending,
    /// Pending seeds plus this one, even if recorded.
    Force(i64),
    /// Everything.
    All,
}

impl SeedSelection {
    fn reruns(self, version: i64) -> bool {
        match self {
            SeedSelection::Pending => false,
            SeedSelection::Force(v) => v == version,
            SeedSelection::All => true,
        }
    }
}

/// What happened to one seed during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub version: i64,
    pub name: &'static str,
    /// `None` when the seed was already recorded and not selected.
    pub outcome: Option<SeedOutcome>,
}

pub fn all_seeds() -> Vec<Box<dyn Seed>> {
    let mut seeds: Vec<Box<dyn Seed>> = vec![
        Box::new(demo_organizations::DemoOrganizations),
        Box::new(admin_user::AdminUser),
    ];
    seeds.sort_by_key(|s| s.version());
    seeds
}

/// Apply pending seeds on an already-migrated pool (server startup).
pub async fn run_seeds(pool: &SqlitePool) -> Result<Vec<SeedReport>, sqlx::Error> {
    run_selected(pool, SeedSelection::Pending).await
}

/// Apply seeds per `selection`. Forced seeds are forgotten first, so a failure
/// leaves them pending rather than falsely recorded.
pub async fn run_selected(
    pool: &SqlitePool,
    selection: SeedSelection,
) -> Result<Vec<SeedReport>, sqlx::Error> {
    ensure_seeds_table(pool).await?;
    let recorded = applied_versions(pool).await?;

    let mut reports = Vec::new();
    for seed in all_seeds() {
        let version = seed.version();
        let name = seed.name();
        if recorded.contains(&version) {
            if !selection.reruns(version) {
                reports.push(SeedReport { version, name, outcome: None });
                continue;
            }
            forget_seed(pool, version).await?;
        }

        let outcome = seed.run(pool).await?;
        match outcome {
            SeedOutcome::Applied => {
                record_seed(pool, version, name).await?;
                tracing::info!(version, seed = name, "seed applied");
            }
            SeedOutcome::Skipped(reason) => {
                tracing::info!(version, seed = name, reason, "seed skipped");
            }
        }
        reports.push(SeedReport {
            version,
            name,
            outcome: Some(outcome),
        });
    }
    Ok(reports)
}

pub async fn ensure_seeds_table<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _northstar_seeds (
            version INTEGER PRIMARY KEY NOT NULL,
            description TEXT NOT NULL,
            installed_on INTEGER NOT NULL DEFAULT (unixepoch())
        )",
    )
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn applied_versions<'e, E>(executor: E) -> Result<Vec<i64>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>("SELECT version FROM _northstar_seeds ORDER BY version")
        .fetch_all(executor)
        .await
}

async fn record_seed<'e, E>(executor: E, version: i64, name: &str) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("INSERT INTO _northstar_seeds (version, description) VALUES (?, ?)")
        .bind(version)
        .bind(name)
        .execute(executor)
        .await?;
    Ok(())
}

/// Drop a version from the ledger so the next run applies it again.
pub async fn forget_seed<'e, E>(executor: E, version: i64) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM _northstar_seeds WHERE version = ?")
        .bind(version)
        .execute(executor)
        .await?;
    Ok(())
}
