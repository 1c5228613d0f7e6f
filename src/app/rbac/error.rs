use crate::app::domain::OrganizationId;

/// Why a parent-link walk gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeFault {
    #[error("parent chain loops back on itself")]
    Cycle,
    #[error("parent {0} does not exist")]
    DanglingParent(OrganizationId),
    #[error("parent chain deeper than {0} levels")]
    TooDeep(usize),
}

/// Failures surfaced by the access-control engine.
///
/// A denied permission is not an error: it is a `false` or a
/// [`Decision`](super::Decision) with `allowed == false`.
#[derive(Debug, thiserror::Error)]
pub enum RbacError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("organization tree is malformed at {org_id}: {fault}")]
    MalformedTree {
        org_id: OrganizationId,
        fault: TreeFault,
    },

    #[error("organization store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl RbacError {
    pub fn organization_not_found(id: &OrganizationId) -> Self {
        RbacError::NotFound {
            kind: "organization",
            id: id.as_str(),
        }
    }
}
