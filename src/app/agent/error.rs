use crate::app::rbac::{OrgRelationship, RbacError};

/// Failures reported by the agent tools. Display strings are shown to the
/// agent verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("NORTHSTAR_USER_ID environment variable is not set.")]
    CallerNotConfigured,

    #[error("User with ID \"{0}\" not found.")]
    UserNotFound(String),

    #[error("Organization with ID \"{0}\" not found.")]
    OrganizationNotFound(String),

    #[error("Goal with ID \"{0}\" not found.")]
    GoalNotFound(String),

    #[error(
        "You don't have permission to submit questions on goals from this organization. \
         Your relationship to the goal's organization: {relationship}"
    )]
    PermissionDenied { relationship: OrgRelationship },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Rbac(#[from] RbacError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ToolError {
    /// The relationship behind a permission denial, if that is what this is.
    pub fn relationship(&self) -> Option<OrgRelationship> {
        match self {
            ToolError::PermissionDenied { relationship } => Some(*relationship),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_names_the_relationship() {
        let err = ToolError::PermissionDenied {
            relationship: OrgRelationship::Descendant,
        };
        assert!(err.to_string().ends_with("Your relationship to the goal's organization: DESCENDANT"));
        assert_eq!(err.relationship(), Some(OrgRelationship::Descendant));
        assert_eq!(ToolError::GoalNotFound("x".into()).relationship(), None);
    }
}
