//! Organization-relationship checks for request handlers.
//!
//! **Rule**: Never trust a client-supplied org. Resolve the resource's owning
//! org from the database and ask the gate on every read and write.

use crate::app::{
    db,
    domain::OrganizationId,
    error::AppError,
    rbac::{Action, Decision},
    session::SessionUser,
    AppState,
};

/// Parse an organization id from a path. A malformed id cannot name a real
/// organization, so it is treated like any unrelated one: denied.
pub fn parse_org_id(raw: &str) -> Result<OrganizationId, AppError> {
    OrganizationId::from_string(raw).map_err(|_| AppError::Forbidden)
}

/// Require `action` on something owned by `resource_org_id`. Returns the decision
/// so callers can reuse the relationship.
pub async fn require_action(
    state: &AppState,
    caller: &SessionUser,
    resource_org_id: &OrganizationId,
    action: Action,
) -> Result<Decision, AppError> {
    let decision = state
        .gate
        .decide(&caller.organization_id, resource_org_id, action)
        .await?;
    deny_unless_allowed(caller, resource_org_id, decision)
}

/// [`require_action`] for an action on a specific goal. Goal actions also
/// honour the goal's visibility.
pub async fn require_goal_action(
    state: &AppState,
    caller: &SessionUser,
    goal: &db::goals::Goal,
    action: Action,
) -> Result<Decision, AppError> {
    let goal_org_id = goal.organization_id()?;
    let decision = state
        .gate
        .decide_goal(&caller.organization_id, &goal_org_id, goal.visibility, action)
        .await?;
    deny_unless_allowed(caller, &goal_org_id, decision)
}

/// Load a goal the caller may at least read. Goals the caller cannot see are
/// reported as missing rather than forbidden.
pub async fn find_readable_goal(
    state: &AppState,
    caller: &SessionUser,
    goal_id: &str,
) -> Result<db::goals::Goal, AppError> {
    let not_found = || AppError::NotFound("Goal not found".to_string());
    let goal = db::goals::find_by_id(&state.db, goal_id)
        .await?
        .ok_or_else(not_found)?;
    match require_goal_action(state, caller, &goal, Action::GoalRead).await {
        Ok(_) => Ok(goal),
        Err(AppError::Forbidden) => Err(not_found()),
        Err(e) => Err(e),
    }
}

fn deny_unless_allowed(
    caller: &SessionUser,
    resource_org_id: &OrganizationId,
    decision: Decision,
) -> Result<Decision, AppError> {
    if decision.allowed {
        return Ok(decision);
    }
    tracing::debug!(
        user_id = %caller.user_id,
        acting_org = %caller.organization_id,
        resource_org = %resource_org_id,
        relationship = %decision.relationship,
        action = %decision.action,
        "permission denied"
    );
    Err(AppError::Forbidden)
}
