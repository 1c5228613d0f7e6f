use serde::Serialize;
use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{GoalVisibility, Theme};

/// Per-user settings. Users without a stored row get [`Preferences::defaults`].
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Preferences {
    pub theme: Theme,
    pub default_goal_visibility: GoalVisibility,
    pub notifications_enabled: bool,
    pub locale: String,
    pub timezone: String,
}

impl Preferences {
    pub fn defaults() -> Self {
        Self {
            theme: Theme::System,
            default_goal_visibility: GoalVisibility::Public,
            notifications_enabled: true,
            locale: "en".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

/// Partial update. `None` leaves the setting as is.
#[derive(Debug, Default)]
pub struct PreferenceChanges {
    pub theme: Option<Theme>,
    pub default_goal_visibility: Option<GoalVisibility>,
    pub notifications_enabled: Option<bool>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
}

/// Stored preferences for a user, or the defaults.
pub async fn find_for_user<'e, E>(executor: E, user_id: &str) -> Result<Preferences, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, Preferences>(
        "SELECT theme, default_goal_visibility, notifications_enabled, locale, timezone FROM user_preferences WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.unwrap_or_else(Preferences::defaults))
}

/// Write the changes over the current (or default) preferences in one statement.
pub async fn upsert<'e, E>(
    executor: E,
    user_id: &str,
    current: &Preferences,
    changes: &PreferenceChanges,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query(
        "INSERT INTO user_preferences (user_id, theme, default_goal_visibility, notifications_enabled, locale, timezone, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(user_id) DO UPDATE SET theme = excluded.theme, default_goal_visibility = excluded.default_goal_visibility, notifications_enabled = excluded.notifications_enabled, locale = excluded.locale, timezone = excluded.timezone, updated_at = excluded.updated_at",
    )
    .bind(changes.theme.unwrap_or(current.theme))
    .bind(changes.default_goal_visibility.unwrap_or(current.default_goal_visibility))
    .bind(changes.notifications_enabled.unwrap_or(current.notifications_enabled))
    .bind(changes.locale.as_deref().unwrap_or(&current.locale))
    .bind(changes.timezone.as_deref().unwrap_or(&current.timezone))
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}
