mod list;
mod permissions;
mod show;
mod tree;

use std::collections::{HashMap, HashSet, VecDeque};

use axum::Router;
use serde::Serialize;

use crate::app::{
    db,
    domain::{Organization, OrganizationId},
    error::AppError,
    rbac::OrgRelationship,
    AppState,
};

/// An organization as seen by a particular caller.
#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub ai_guidelines: Option<String>,
    pub relationship: OrgRelationship,
}

impl OrganizationResponse {
    pub fn new(org: Organization, relationship: OrgRelationship) -> Self {
        Self {
            id: org.id.as_str(),
            parent_id: org.parent_id.map(|p| p.as_str()),
            name: org.name,
            description: org.description,
            ai_guidelines: org.ai_guidelines,
            relationship,
        }
    }
}

/// The tree containing the caller's organization, with the caller's
/// relationship to every member. Every org outside it is NONE to the caller.
struct CallerTree {
    pub root: Organization,
    /// Breadth-first from the root.
    pub members: Vec<Organization>,
    pub children: HashMap<OrganizationId, Vec<Organization>>,
    pub relationships: HashMap<OrganizationId, OrgRelationship>,
}

impl CallerTree {
    /// `None` when the caller's organization no longer resolves to a root.
    pub async fn load(
        state: &AppState,
        caller_org_id: &OrganizationId,
    ) -> Result<Option<Self>, AppError> {
        let path = state.orgs.get_path(caller_org_id).await?;
        let Some(root) = path.into_iter().next() else {
            return Ok(None);
        };

        let mut children: HashMap<OrganizationId, Vec<Organization>> = HashMap::new();
        for row in db::organizations::list_all(&state.db).await? {
            let org = row.into_domain()?;
            if let Some(parent_id) = org.parent_id.clone() {
                children.entry(parent_id).or_default().push(org);
            }
        }

        // The visited set keeps a corrupt parent link from looping.
        let resolver = state.gate.resolver();
        let mut members = Vec::new();
        let mut relationships = HashMap::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([root.clone()]);
        while let Some(org) = queue.pop_front() {
            if !seen.insert(org.id.clone()) {
                continue;
            }
            let relationship = resolver.compute_relationship(caller_org_id, &org.id).await?;
            relationships.insert(org.id.clone(), relationship);
            if let Some(kids) = children.get(&org.id) {
                queue.extend(kids.iter().cloned());
            }
            members.push(org);
        }

        Ok(Some(Self {
            root,
            members,
            children,
            relationships,
        }))
    }

    pub fn relationship(&self, id: &OrganizationId) -> OrgRelationship {
        self.relationships
            .get(id)
            .copied()
            .unwrap_or(OrgRelationship::None)
    }
}

/// Organization routes (list, tree, show, update, path, permissions).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(list::routes())
        .merge(tree::routes())
        .merge(show::routes())
        .merge(permissions::routes())
}
