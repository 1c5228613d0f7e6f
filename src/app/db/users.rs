use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{Email, OrganizationId, UserId};

const SELECT_USERS: &str = "SELECT id, organization_id, name, email, job_function, is_leader, is_admin, created_at, updated_at FROM users";

/// Database row for users table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub email: String,
    pub job_function: Option<String>,
    pub is_leader: bool,
    pub is_admin: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    /// The user's home organization, parsed.
    pub fn organization_id(&self) -> Result<OrganizationId, sqlx::Error> {
        super::decode_id(OrganizationId::from_string(&self.organization_id))
    }
}

/// Data structure for inserting a new user.
pub struct NewUser {
    pub id: UserId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub email: Email,
    pub job_function: Option<String>,
    pub is_leader: bool,
    pub is_admin: bool,
}

/// Partial update. `None` leaves the column as is.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub organization_id: Option<OrganizationId>,
    pub name: Option<String>,
    pub email: Option<Email>,
    pub job_function: Option<String>,
    pub is_leader: Option<bool>,
    pub is_admin: Option<bool>,
}

/// Find a user by email address.
pub async fn find_by_email<'e, E>(executor: E, email: &Email) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>(&format!("{SELECT_USERS} WHERE email = ?"))
        .bind(email.as_str())
        .fetch_optional(executor)
        .await
}

/// Find a user by ID.
pub async fn find_by_id<'e, E>(executor: E, user_id: &str) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>(&format!("{SELECT_USERS} WHERE id = ?"))
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// Every user, ordered by name.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>(&format!("{SELECT_USERS} ORDER BY name, id"))
        .fetch_all(executor)
        .await
}

/// Members of an organization, ordered by name.
pub async fn find_by_organization<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>(&format!(
        "{SELECT_USERS} WHERE organization_id = ? ORDER BY name, id"
    ))
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// Leaders across all organizations. Used to label the org tree.
pub async fn list_leaders<'e, E>(executor: E) -> Result<Vec<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>(&format!("{SELECT_USERS} WHERE is_leader = 1 ORDER BY name"))
        .fetch_all(executor)
        .await
}

/// Insert a new user into the database.
pub async fn insert<'e, E>(executor: E, user: &NewUser) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query(
        "INSERT INTO users (id, organization_id, name, email, job_function, is_leader, is_admin, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id.as_str())
    .bind(user.organization_id.as_str())
    .bind(&user.name)
    .bind(user.email.as_str())
    .bind(&user.job_function)
    .bind(user.is_leader)
    .bind(user.is_admin)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Apply a partial update. Returns false when the user does not exist.
pub async fn update<'e, E>(executor: E, user_id: &str, changes: &UserChanges) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE users SET organization_id = COALESCE(?, organization_id), name = COALESCE(?, name), email = COALESCE(?, email), job_function = COALESCE(?, job_function), is_leader = COALESCE(?, is_leader), is_admin = COALESCE(?, is_admin), updated_at = ? WHERE id = ?",
    )
    .bind(changes.organization_id.as_ref().map(|id| id.as_str()))
    .bind(&changes.name)
    .bind(changes.email.as_ref().map(|e| e.as_str().to_string()))
    .bind(&changes.job_function)
    .bind(changes.is_leader)
    .bind(changes.is_admin)
    .bind(now)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Flip the leader flag. Returns false when the user does not exist.
pub async fn toggle_leader<'e, E>(executor: E, user_id: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query("UPDATE users SET is_leader = NOT is_leader, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a user. Sessions, preferences and authored comments go with it;
/// owned goals are kept without an owner.
pub async fn delete<'e, E>(executor: E, user_id: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Whether an insert or update failed on the unique email index.
pub fn is_duplicate_email(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
