//! Read access to the organization forest.
//!
//! The engine only ever reads through [`OrgStore`]; it is handed a store at
//! construction instead of reaching for a global handle.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{RbacError, TreeFault};
use crate::app::{
    db,
    domain::{Organization, OrganizationId},
};

/// Default cap on parent-link walks. Real hierarchies are a handful of levels deep.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 64;

/// Shared handle injected into the resolver, scope calculator and gate.
pub type SharedOrgStore = Arc<dyn OrgStore>;

/// Keyed access to organizations. Lookups are independent pure reads, so callers
/// may issue them in any order or concurrently.
#[async_trait]
pub trait OrgStore: Send + Sync {
    /// Point lookup. `Ok(None)` when the id does not resolve.
    async fn get_by_id(&self, id: &OrganizationId) -> Result<Option<Organization>, RbacError>;

    /// Direct children of `parent_id`, ordered by name.
    async fn get_children(&self, parent_id: &OrganizationId)
        -> Result<Vec<Organization>, RbacError>;

    /// Longest parent chain [`get_path`](OrgStore::get_path) will follow.
    fn max_depth(&self) -> usize {
        DEFAULT_MAX_TREE_DEPTH
    }

    /// Lookup that treats a missing id as [`RbacError::NotFound`].
    async fn require(&self, id: &OrganizationId) -> Result<Organization, RbacError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| RbacError::organization_not_found(id))
    }

    /// Root→node path, inclusive of `id`. Empty when `id` does not resolve.
    ///
    /// Fails with [`RbacError::MalformedTree`] instead of looping when the parent
    /// chain revisits a node, points at a missing org, or exceeds [`max_depth`](OrgStore::max_depth).
    async fn get_path(&self, id: &OrganizationId) -> Result<Vec<Organization>, RbacError> {
        let mut path = Vec::new();
        let Some(mut current) = self.get_by_id(id).await? else {
            return Ok(path);
        };

        let max_depth = self.max_depth();
        let mut seen = HashSet::new();
        loop {
            if !seen.insert(current.id.clone()) {
                return Err(RbacError::MalformedTree {
                    org_id: current.id,
                    fault: TreeFault::Cycle,
                });
            }
            if seen.len() > max_depth {
                return Err(RbacError::MalformedTree {
                    org_id: current.id,
                    fault: TreeFault::TooDeep(max_depth),
                });
            }

            let child_id = current.id.clone();
            let parent_id = current.parent_id.clone();
            path.push(current);

            let Some(parent_id) = parent_id else { break };
            current = match self.get_by_id(&parent_id).await? {
                Some(parent) => parent,
                None => {
                    return Err(RbacError::MalformedTree {
                        org_id: child_id,
                        fault: TreeFault::DanglingParent(parent_id),
                    })
                }
            };
        }

        path.reverse();
        Ok(path)
    }
}

/// [`OrgStore`] over the `organizations` table.
#[derive(Clone)]
pub struct SqliteOrgStore {
    pool: SqlitePool,
    max_depth: usize,
}

impl SqliteOrgStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            max_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[async_trait]
impl OrgStore for SqliteOrgStore {
    async fn get_by_id(&self, id: &OrganizationId) -> Result<Option<Organization>, RbacError> {
        let row = db::organizations::find_by_id(&self.pool, id).await?;
        Ok(row.map(|r| r.into_domain()).transpose()?)
    }

    async fn get_children(
        &self,
        parent_id: &OrganizationId,
    ) -> Result<Vec<Organization>, RbacError> {
        let rows = db::organizations::find_children(&self.pool, parent_id).await?;
        let orgs = rows
            .into_iter()
            .map(|r| r.into_domain())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orgs)
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// In-process [`OrgStore`] backed by a map. Built up front, then read-only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrgStore {
    orgs: HashMap<OrganizationId, Organization>,
}

impl InMemoryOrgStore {
    pub fn new(orgs: impl IntoIterator<Item = Organization>) -> Self {
        Self {
            orgs: orgs.into_iter().map(|o| (o.id.clone(), o)).collect(),
        }
    }
}

#[async_trait]
impl OrgStore for InMemoryOrgStore {
    async fn get_by_id(&self, id: &OrganizationId) -> Result<Option<Organization>, RbacError> {
        Ok(self.orgs.get(id).cloned())
    }

    async fn get_children(
        &self,
        parent_id: &OrganizationId,
    ) -> Result<Vec<Organization>, RbacError> {
        let mut children: Vec<Organization> = self
            .orgs
            .values()
            .filter(|o| o.parent_id.as_ref() == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn org(name: &str, parent: Option<&Organization>) -> Organization {
        Organization {
            id: OrganizationId::new(),
            parent_id: parent.map(|p| p.id.clone()),
            name: name.to_string(),
            description: None,
            ai_guidelines: None,
        }
    }

    fn names(path: &[Organization]) -> Vec<&str> {
        path.iter().map(|o| o.name.as_str()).collect()
    }

    #[tokio::test]
    async fn path_runs_from_root_to_node() {
        let acme = org("Acme", None);
        let eng = org("Engineering", Some(&acme));
        let platform = org("Platform", Some(&eng));
        let store = InMemoryOrgStore::new([acme, eng, platform.clone()]);

        let path = store.get_path(&platform.id).await.unwrap();
        assert_eq!(names(&path), ["Acme", "Engineering", "Platform"]);
    }

    #[tokio::test]
    async fn root_path_is_just_the_root() {
        let acme = org("Acme", None);
        let store = InMemoryOrgStore::new([acme.clone()]);

        let path = store.get_path(&acme.id).await.unwrap();
        assert_eq!(path, vec![acme]);
    }

    #[tokio::test]
    async fn unknown_id_has_empty_path() {
        let store = InMemoryOrgStore::default();
        assert!(store.get_path(&OrganizationId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cycle_is_reported_not_looped() {
        let mut a = org("A", None);
        let b = org("B", Some(&a));
        a.parent_id = Some(b.id.clone());
        let store = InMemoryOrgStore::new([a.clone(), b]);

        let err = store.get_path(&a.id).await.unwrap_err();
        assert!(matches!(
            err,
            RbacError::MalformedTree {
                fault: TreeFault::Cycle,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn self_parent_is_a_cycle() {
        let mut a = org("A", None);
        a.parent_id = Some(a.id.clone());
        let store = InMemoryOrgStore::new([a.clone()]);

        let err = store.get_path(&a.id).await.unwrap_err();
        assert!(matches!(
            err,
            RbacError::MalformedTree {
                fault: TreeFault::Cycle,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn dangling_parent_names_the_missing_id() {
        let ghost = OrganizationId::new();
        let mut orphan = org("Orphan", None);
        orphan.parent_id = Some(ghost.clone());
        let store = InMemoryOrgStore::new([orphan.clone()]);

        match store.get_path(&orphan.id).await.unwrap_err() {
            RbacError::MalformedTree {
                org_id,
                fault: TreeFault::DanglingParent(missing),
            } => {
                assert_eq!(org_id, orphan.id);
                assert_eq!(missing, ghost);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn depth_cap_stops_long_chains() {
        let mut orgs = vec![org("L0", None)];
        for i in 1..=DEFAULT_MAX_TREE_DEPTH {
            let next = org(&format!("L{i}"), orgs.last());
            orgs.push(next);
        }
        let leaf = orgs.last().unwrap().id.clone();
        let store = InMemoryOrgStore::new(orgs);

        let err = store.get_path(&leaf).await.unwrap_err();
        assert!(matches!(
            err,
            RbacError::MalformedTree {
                fault: TreeFault::TooDeep(DEFAULT_MAX_TREE_DEPTH),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn children_sorted_by_name() {
        let acme = org("Acme", None);
        let sales = org("Sales", Some(&acme));
        let eng = org("Engineering", Some(&acme));
        let store = InMemoryOrgStore::new([acme.clone(), sales, eng]);

        let children = store.get_children(&acme.id).await.unwrap();
        assert_eq!(names(&children), ["Engineering", "Sales"]);
    }

    #[tokio::test]
    async fn require_reports_not_found() {
        let store = InMemoryOrgStore::default();
        let err = store.require(&OrganizationId::new()).await.unwrap_err();
        assert!(matches!(err, RbacError::NotFound { kind: "organization", .. }));
    }
}
