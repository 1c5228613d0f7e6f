//! Read-mostly tools for an external assistant acting on behalf of one user.
//!
//! Each tool takes an already-resolved [`Caller`]; resolving the identity is
//! the transport's job (session cookie over HTTP, `NORTHSTAR_USER_ID` on the CLI).

mod context;
mod error;
mod tools;

use serde::Serialize;
use serde_json::{json, Value};

pub use context::{build_user_context, Guideline, UserContext, UserProfile};
pub use error::ToolError;
pub use tools::{
    get_parent_goals, search_collaborator_goals, submit_question, CollaboratorGoal, GoalSummary,
    OrgRef, ParentGoals, SubmittedQuestion, MAX_QUESTION_LEN,
};

use crate::app::{db, domain::OrganizationId};

/// The user an agent acts for.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: db::User,
    pub organization_id: OrganizationId,
}

/// Look up the acting user. `None` means no identity was configured.
pub async fn resolve_caller(
    pool: &sqlx::SqlitePool,
    user_id: Option<&str>,
) -> Result<Caller, ToolError> {
    let user_id = user_id.ok_or(ToolError::CallerNotConfigured)?;
    let user = db::users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ToolError::UserNotFound(user_id.to_string()))?;
    let organization_id = user.organization_id()?;
    Ok(Caller {
        user,
        organization_id,
    })
}

/// `{"success": true, "data": ..}` or `{"success": false, "error": ..}`, the
/// shape agents consume.
pub fn envelope<T: Serialize>(result: Result<T, ToolError>) -> Value {
    match result {
        Ok(data) => json!({ "success": true, "data": data }),
        Err(err) => {
            let mut body = json!({ "success": false, "error": err.to_string() });
            if let Some(relationship) = err.relationship() {
                body["relationship"] = json!(relationship);
            }
            body
        }
    }
}
