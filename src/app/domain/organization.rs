use serde::Serialize;

use super::OrganizationId;

/// A node in the organization forest. `parent_id == None` marks a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub parent_id: Option<OrganizationId>,
    pub name: String,
    pub description: Option<String>,
    pub ai_guidelines: Option<String>,
}

impl Organization {
    /// Whether this organization sits at the top of its tree.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
