use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// What a comment on a goal is for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommentKind {
    Question,
    Response,
    Note,
}

impl CommentKind {
    /// Status a freshly created comment of this kind starts in.
    pub fn initial_status(self) -> CommentStatus {
        match self {
            CommentKind::Response => CommentStatus::Answered,
            CommentKind::Question | CommentKind::Note => CommentStatus::Pending,
        }
    }
}

/// Comment workflow state. Only questions really move through it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommentStatus {
    Pending,
    Answered,
    Closed,
}
