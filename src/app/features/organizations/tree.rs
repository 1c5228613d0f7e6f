use std::collections::{HashMap, HashSet};

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::CallerTree;
use crate::app::{
    db,
    domain::{Organization, OrganizationId},
    error::AppError,
    rbac::{has_permission, Action, OrgRelationship},
    session::ApiAuthenticatedSession,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct LeaderRef {
    pub id: String,
    pub name: String,
}

/// One organization in the dashboard tree. Details are only filled in where
/// the caller may read the organization; unrelated branches show structure only.
#[derive(Debug, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub relationship: OrgRelationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<LeaderRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_goal_count: Option<i64>,
    pub children: Vec<TreeNode>,
}

struct TreeData {
    children: HashMap<OrganizationId, Vec<Organization>>,
    relationships: HashMap<OrganizationId, OrgRelationship>,
    leaders: HashMap<String, db::User>,
    counts: HashMap<String, db::goals::GoalCounts>,
}

/// GET /api/organizations/tree — The caller's whole organization tree, root down.
pub async fn tree(
    ApiAuthenticatedSession(session): ApiAuthenticatedSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<TreeNode>>, AppError> {
    let Some(tree) = CallerTree::load(&state, &session.organization_id).await? else {
        return Ok(Json(Vec::new()));
    };

    let (leaders, counts) = tokio::try_join!(
        db::users::list_leaders(&state.db),
        db::goals::count_by_organization(&state.db),
    )?;

    let mut leader_by_org = HashMap::new();
    for leader in leaders {
        leader_by_org
            .entry(leader.organization_id.clone())
            .or_insert(leader);
    }

    let CallerTree {
        root,
        children,
        relationships,
        ..
    } = tree;
    let data = TreeData {
        children,
        relationships,
        leaders: leader_by_org,
        counts: counts
            .into_iter()
            .map(|c| (c.organization_id.clone(), c))
            .collect(),
    };

    let mut visited = HashSet::new();
    Ok(Json(vec![build_node(&data, &root, &mut visited)]))
}

fn build_node(data: &TreeData, org: &Organization, visited: &mut HashSet<OrganizationId>) -> TreeNode {
    visited.insert(org.id.clone());
    let relationship = data
        .relationships
        .get(&org.id)
        .copied()
        .unwrap_or(OrgRelationship::None);
    let readable = has_permission(relationship, Action::OrganizationRead);
    let key = org.id.as_str();

    let children = data
        .children
        .get(&org.id)
        .map(|kids| {
            kids.iter()
                .filter(|k| !visited.contains(&k.id))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
        .into_iter()
        .map(|k| build_node(data, k, visited))
        .collect();

    let counts = data.counts.get(&key).filter(|_| readable);
    TreeNode {
        id: key.clone(),
        name: org.name.clone(),
        relationship,
        leader: data
            .leaders
            .get(&key)
            .filter(|_| readable)
            .map(|u| LeaderRef {
                id: u.id.clone(),
                name: u.name.clone(),
            }),
        goal_count: readable.then(|| counts.map_or(0, |c| c.total)),
        active_goal_count: readable.then(|| counts.map_or(0, |c| c.active)),
        children,
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations/tree", get(tree))
}
