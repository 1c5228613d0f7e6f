use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{GoalStatus, GoalVisibility, OrganizationId};

const SELECT_GOALS: &str = "SELECT id, organization_id, owner_id, title, description, key_results, status, progress, visibility, created_at, updated_at FROM goals";

/// Database row for goals table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Goal {
    pub id: String,
    pub organization_id: String,
    pub owner_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// JSON array of strings, as stored.
    pub key_results: Option<String>,
    pub status: GoalStatus,
    pub progress: i64,
    pub visibility: GoalVisibility,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Goal {
    /// The owning organization, parsed.
    pub fn organization_id(&self) -> Result<OrganizationId, sqlx::Error> {
        super::decode_id(OrganizationId::from_string(&self.organization_id))
    }

    /// Key results as a list. Missing or malformed JSON reads as no key results.
    pub fn key_results_list(&self) -> Vec<String> {
        parse_key_results(self.key_results.as_deref())
    }
}

/// Lenient decoding of the stored key-results column.
pub fn parse_key_results(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}

/// Storage form of a key-results list.
pub fn encode_key_results(key_results: &[String]) -> String {
    serde_json::Value::from(key_results.to_vec()).to_string()
}

/// Data structure for inserting a new goal.
pub struct NewGoal {
    pub id: String,
    pub organization_id: OrganizationId,
    pub owner_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub key_results: Vec<String>,
    pub status: GoalStatus,
    pub progress: i64,
    pub visibility: GoalVisibility,
}

/// Editable goal fields. `None` leaves a field unchanged.
#[derive(Debug, Default)]
pub struct GoalChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub key_results: Option<Vec<String>>,
    pub status: Option<GoalStatus>,
    pub progress: Option<i64>,
    pub visibility: Option<GoalVisibility>,
}

/// Per-organization goal counts for the org tree.
#[derive(Debug, Clone, FromRow)]
pub struct GoalCounts {
    pub organization_id: String,
    pub total: i64,
    pub active: i64,
}

/// Find a goal by ID.
pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Goal>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Goal>(
        "SELECT id, organization_id, owner_id, title, description, key_results, status, progress, visibility, created_at, updated_at FROM goals WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Goals of one organization, newest first.
pub async fn find_by_organization<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<Goal>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Goal>(
        "SELECT id, organization_id, owner_id, title, description, key_results, status, progress, visibility, created_at, updated_at FROM goals WHERE organization_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// Goals of any of the given organizations, newest first.
pub async fn find_by_organizations<'e, E>(
    executor: E,
    organization_ids: &[OrganizationId],
) -> Result<Vec<Goal>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    if organization_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_GOALS);
    push_organization_filter(&mut qb, " WHERE ", organization_ids);
    qb.push(" ORDER BY created_at DESC, id DESC");
    qb.build_query_as::<Goal>().fetch_all(executor).await
}

/// Keyword search over title and description, restricted to the given organizations.
pub async fn search<'e, E>(
    executor: E,
    keyword: &str,
    organization_ids: &[OrganizationId],
) -> Result<Vec<Goal>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    if organization_ids.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = format!("%{}%", keyword.trim());
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_GOALS);
    qb.push(" WHERE (title LIKE ");
    qb.push_bind(pattern.clone());
    qb.push(" OR description LIKE ");
    qb.push_bind(pattern);
    qb.push(")");
    push_organization_filter(&mut qb, " AND ", organization_ids);
    qb.push(" ORDER BY created_at DESC, id DESC");
    qb.build_query_as::<Goal>().fetch_all(executor).await
}

fn push_organization_filter(
    qb: &mut QueryBuilder<'_, Sqlite>,
    prefix: &str,
    organization_ids: &[OrganizationId],
) {
    qb.push(prefix);
    qb.push("organization_id IN (");
    let mut separated = qb.separated(", ");
    for id in organization_ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(")");
}

/// Goal totals and in-progress counts per organization.
pub async fn count_by_organization<'e, E>(executor: E) -> Result<Vec<GoalCounts>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, GoalCounts>(
        "SELECT organization_id, COUNT(*) AS total, SUM(CASE WHEN status = 'in_progress' THEN 1 ELSE 0 END) AS active FROM goals GROUP BY organization_id",
    )
    .fetch_all(executor)
    .await
}

/// Insert a new goal.
pub async fn insert<'e, E>(executor: E, goal: &NewGoal) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let key_results = if goal.key_results.is_empty() {
        None
    } else {
        Some(encode_key_results(&goal.key_results))
    };

    sqlx::query(
        "INSERT INTO goals (id, organization_id, owner_id, title, description, key_results, status, progress, visibility, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&goal.id)
    .bind(goal.organization_id.as_str())
    .bind(&goal.owner_id)
    .bind(&goal.title)
    .bind(&goal.description)
    .bind(key_results)
    .bind(goal.status)
    .bind(goal.progress)
    .bind(goal.visibility)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Apply changes to a goal. Returns false if it does not exist.
pub async fn update<'e, E>(executor: E, id: &str, changes: &GoalChanges) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let key_results = changes.key_results.as_deref().map(encode_key_results);

    let result = sqlx::query(
        "UPDATE goals SET title = COALESCE(?, title), description = COALESCE(?, description), key_results = COALESCE(?, key_results), status = COALESCE(?, status), progress = COALESCE(?, progress), visibility = COALESCE(?, visibility), updated_at = ? WHERE id = ?",
    )
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(key_results)
    .bind(changes.status)
    .bind(changes.progress)
    .bind(changes.visibility)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a goal and, through the foreign key, its comments.
pub async fn delete<'e, E>(executor: E, id: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM goals WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
