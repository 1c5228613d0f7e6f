use serde::Serialize;

use super::{
    permissions::{has_permission, Action, Resource},
    OrgRelationship, RbacError, RelationshipResolver, SharedOrgStore,
};
use crate::app::domain::{GoalVisibility, OrganizationId};

/// Outcome of one authorization check. The relationship is kept so callers can
/// word a denial or log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub relationship: OrgRelationship,
    pub action: Action,
    pub allowed: bool,
}

/// Goal visibility layered on top of the matrix: outside the owning
/// organization only `public` and `team_only` goals can be seen.
pub fn goal_visible_to(relationship: OrgRelationship, visibility: GoalVisibility) -> bool {
    relationship == OrgRelationship::SelfOrg || visibility.visible_outside_owner()
}

/// Single entry point for "may an org-member do `action` on something owned by `resource_org`".
///
/// Unknown organizations on either side classify as `NONE`, which grants nothing.
#[derive(Clone)]
pub struct AuthorizationGate {
    resolver: RelationshipResolver,
}

impl AuthorizationGate {
    pub fn new(store: SharedOrgStore) -> Self {
        Self {
            resolver: RelationshipResolver::new(store),
        }
    }

    pub fn resolver(&self) -> &RelationshipResolver {
        &self.resolver
    }

    pub async fn decide(
        &self,
        acting_org_id: &OrganizationId,
        resource_org_id: &OrganizationId,
        action: Action,
    ) -> Result<Decision, RbacError> {
        let relationship = self
            .resolver
            .compute_relationship(acting_org_id, resource_org_id)
            .await?;
        Ok(Decision {
            relationship,
            action,
            allowed: has_permission(relationship, action),
        })
    }

    pub async fn authorize(
        &self,
        acting_org_id: &OrganizationId,
        resource_org_id: &OrganizationId,
        action: Action,
    ) -> Result<bool, RbacError> {
        Ok(self.decide(acting_org_id, resource_org_id, action).await?.allowed)
    }

    /// [`decide`](Self::decide) for an action on a specific goal: goal actions
    /// from outside the owning org additionally need a non-private goal.
    pub async fn decide_goal(
        &self,
        acting_org_id: &OrganizationId,
        goal_org_id: &OrganizationId,
        visibility: GoalVisibility,
        action: Action,
    ) -> Result<Decision, RbacError> {
        let mut decision = self.decide(acting_org_id, goal_org_id, action).await?;
        if action.resource() == Resource::Goal
            && !goal_visible_to(decision.relationship, visibility)
        {
            decision.allowed = false;
        }
        Ok(decision)
    }

    pub async fn authorize_goal(
        &self,
        acting_org_id: &OrganizationId,
        goal_org_id: &OrganizationId,
        visibility: GoalVisibility,
        action: Action,
    ) -> Result<bool, RbacError> {
        Ok(self
            .decide_goal(acting_org_id, goal_org_id, visibility, action)
            .await?
            .allowed)
    }
}
