//! Static permission matrix: relationship → allowed actions.
//!
//! | Relationship | Goals          | Comments                        | Organization |
//! |--------------|----------------|---------------------------------|--------------|
//! | SELF         | full CRUD      | read, create, question, respond | read, update |
//! | PARENT       | read           | submit question                 | read         |
//! | CHILD        | read           | read, respond                   | read         |
//! | ANCESTOR     | read           | read                            | read         |
//! | DESCENDANT   | read           | read                            | read         |
//! | SIBLING      | read           | submit question                 | read         |
//! | NONE         | -              | -                               | -            |

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::OrgRelationship;

/// Kind of resource an [`Action`] operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Goal,
    Comment,
    Organization,
}

/// Operation crossed with resource kind. Parses from and displays as the
/// `resource:verb` tag; an unknown tag fails to parse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Action {
    #[serde(rename = "goal:read")]
    #[strum(serialize = "goal:read")]
    GoalRead,
    #[serde(rename = "goal:create")]
    #[strum(serialize = "goal:create")]
    GoalCreate,
    #[serde(rename = "goal:update")]
    #[strum(serialize = "goal:update")]
    GoalUpdate,
    #[serde(rename = "goal:delete")]
    #[strum(serialize = "goal:delete")]
    GoalDelete,
    #[serde(rename = "comment:read")]
    #[strum(serialize = "comment:read")]
    CommentRead,
    #[serde(rename = "comment:create")]
    #[strum(serialize = "comment:create")]
    CommentCreate,
    #[serde(rename = "comment:submit_question")]
    #[strum(serialize = "comment:submit_question")]
    CommentSubmitQuestion,
    #[serde(rename = "comment:respond")]
    #[strum(serialize = "comment:respond")]
    CommentRespond,
    #[serde(rename = "organization:read")]
    #[strum(serialize = "organization:read")]
    OrganizationRead,
    #[serde(rename = "organization:update")]
    #[strum(serialize = "organization:update")]
    OrganizationUpdate,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::GoalRead,
        Action::GoalCreate,
        Action::GoalUpdate,
        Action::GoalDelete,
        Action::CommentRead,
        Action::CommentCreate,
        Action::CommentSubmitQuestion,
        Action::CommentRespond,
        Action::OrganizationRead,
        Action::OrganizationUpdate,
    ];

    pub fn resource(self) -> Resource {
        match self {
            Action::GoalRead | Action::GoalCreate | Action::GoalUpdate | Action::GoalDelete => {
                Resource::Goal
            }
            Action::CommentRead
            | Action::CommentCreate
            | Action::CommentSubmitQuestion
            | Action::CommentRespond => Resource::Comment,
            Action::OrganizationRead | Action::OrganizationUpdate => Resource::Organization,
        }
    }
}

const READ_ONLY: &[Action] = &[
    Action::GoalRead,
    Action::CommentRead,
    Action::OrganizationRead,
];

/// Every action granted for `relationship`. Total over [`OrgRelationship`]:
/// adding a relationship variant fails to compile until it gets a row here.
pub fn allowed_actions(relationship: OrgRelationship) -> &'static [Action] {
    match relationship {
        OrgRelationship::SelfOrg => &Action::ALL,
        OrgRelationship::Parent | OrgRelationship::Sibling => &[
            Action::GoalRead,
            Action::CommentSubmitQuestion,
            Action::OrganizationRead,
        ],
        OrgRelationship::Child => &[
            Action::GoalRead,
            Action::CommentRead,
            Action::CommentRespond,
            Action::OrganizationRead,
        ],
        OrgRelationship::Ancestor | OrgRelationship::Descendant => READ_ONLY,
        OrgRelationship::None => &[],
    }
}

pub fn has_permission(relationship: OrgRelationship, action: Action) -> bool {
    allowed_actions(relationship).contains(&action)
}

pub fn has_all_permissions(relationship: OrgRelationship, actions: &[Action]) -> bool {
    actions.iter().all(|a| has_permission(relationship, *a))
}

pub fn has_any_permission(relationship: OrgRelationship, actions: &[Action]) -> bool {
    actions.iter().any(|a| has_permission(relationship, *a))
}
