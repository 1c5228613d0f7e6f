use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle state of a goal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Cancelled,
}

/// Who outside the owning organization may see a goal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GoalVisibility {
    #[default]
    Public,
    Private,
    TeamOnly,
}

impl GoalVisibility {
    /// Whether a reader from another organization may see the goal at all.
    /// `private` goals stay inside the owning organization.
    pub fn visible_outside_owner(self) -> bool {
        matches!(self, GoalVisibility::Public | GoalVisibility::TeamOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_parses_storage_strings() {
        assert_eq!("team_only".parse::<GoalVisibility>().unwrap(), GoalVisibility::TeamOnly);
        assert_eq!(GoalVisibility::Private.to_string(), "private");
        assert!("secret".parse::<GoalVisibility>().is_err());
    }

    #[test]
    fn only_private_is_hidden_from_other_orgs() {
        assert!(GoalVisibility::Public.visible_outside_owner());
        assert!(GoalVisibility::TeamOnly.visible_outside_owner());
        assert!(!GoalVisibility::Private.visible_outside_owner());
    }

    #[test]
    fn status_defaults_to_not_started() {
        assert_eq!(GoalStatus::default(), GoalStatus::NotStarted);
        assert_eq!(GoalStatus::InProgress.to_string(), "in_progress");
    }
}
