use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{self, OrganizationId};

/// Database row for organizations table.
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub ai_guidelines: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Organization {
    /// Convert into the domain type used by the access-control engine.
    pub fn into_domain(self) -> Result<domain::Organization, sqlx::Error> {
        let id = super::decode_id(OrganizationId::from_string(&self.id))?;
        let parent_id = self
            .parent_id
            .as_deref()
            .map(|p| super::decode_id(OrganizationId::from_string(p)))
            .transpose()?;
        Ok(domain::Organization {
            id,
            parent_id,
            name: self.name,
            description: self.description,
            ai_guidelines: self.ai_guidelines,
        })
    }
}

/// Data structure for inserting a new organization.
pub struct NewOrganization {
    pub id: OrganizationId,
    pub parent_id: Option<OrganizationId>,
    pub name: String,
    pub description: Option<String>,
    pub ai_guidelines: Option<String>,
}

/// Editable organization fields. `None` leaves a field unchanged.
#[derive(Debug, Default)]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ai_guidelines: Option<String>,
}

/// Find an organization by ID.
pub async fn find_by_id<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Option<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>(
        "SELECT id, parent_id, name, description, ai_guidelines, created_at, updated_at FROM organizations WHERE id = ?",
    )
    .bind(organization_id.as_str())
    .fetch_optional(executor)
    .await
}

/// Direct children of an organization, ordered by name.
pub async fn find_children<'e, E>(
    executor: E,
    parent_id: &OrganizationId,
) -> Result<Vec<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>(
        "SELECT id, parent_id, name, description, ai_guidelines, created_at, updated_at FROM organizations WHERE parent_id = ? ORDER BY name",
    )
    .bind(parent_id.as_str())
    .fetch_all(executor)
    .await
}

/// Every organization, ordered by name.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>(
        "SELECT id, parent_id, name, description, ai_guidelines, created_at, updated_at FROM organizations ORDER BY name",
    )
    .fetch_all(executor)
    .await
}

/// Organizations without a parent, ordered by name.
pub async fn list_roots<'e, E>(executor: E) -> Result<Vec<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>(
        "SELECT id, parent_id, name, description, ai_guidelines, created_at, updated_at FROM organizations WHERE parent_id IS NULL ORDER BY name",
    )
    .fetch_all(executor)
    .await
}

/// Insert a new organization.
pub async fn insert<'e, E>(
    executor: E,
    organization: &NewOrganization,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO organizations (id, parent_id, name, description, ai_guidelines, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(organization.id.as_str())
    .bind(organization.parent_id.as_ref().map(|p| p.as_str()))
    .bind(&organization.name)
    .bind(&organization.description)
    .bind(&organization.ai_guidelines)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Apply changes to an organization. Returns false if it does not exist.
pub async fn update<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    changes: &OrganizationChanges,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE organizations SET name = COALESCE(?, name), description = COALESCE(?, description), ai_guidelines = COALESCE(?, ai_guidelines), updated_at = ? WHERE id = ?",
    )
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(&changes.ai_guidelines)
    .bind(now)
    .bind(organization_id.as_str())
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
