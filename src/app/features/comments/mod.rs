mod list;
mod update;

use axum::Router;

use crate::app::{domain::CommentKind, rbac::Action, AppState};

/// Action a caller needs to post a comment of this kind.
pub fn action_for_kind(kind: CommentKind) -> Action {
    match kind {
        CommentKind::Question => Action::CommentSubmitQuestion,
        CommentKind::Response => Action::CommentRespond,
        CommentKind::Note => Action::CommentCreate,
    }
}

/// Comment routes (list, create, status update).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(list::routes())
        .merge(update::routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rbac::{has_permission, OrgRelationship};

    #[test]
    fn siblings_may_ask_but_not_answer_or_annotate() {
        let rel = OrgRelationship::Sibling;
        assert!(has_permission(rel, action_for_kind(CommentKind::Question)));
        assert!(!has_permission(rel, action_for_kind(CommentKind::Response)));
        assert!(!has_permission(rel, action_for_kind(CommentKind::Note)));
    }
}
