use std::collections::BTreeSet;

use super::{RbacError, SharedOrgStore};
use crate::app::domain::{Organization, OrganizationId};

/// Computes the set of organizations a member may browse and search.
///
/// Narrower than "everything the resolver calls related": own org, every
/// ancestor, and siblings. Descendants are reachable only through the
/// per-action permission check.
#[derive(Clone)]
pub struct AccessScopeCalculator {
    store: SharedOrgStore,
}

impl AccessScopeCalculator {
    pub fn new(store: SharedOrgStore) -> Self {
        Self { store }
    }

    /// Empty when `user_org_id` does not resolve.
    pub async fn accessible_org_ids(
        &self,
        user_org_id: &OrganizationId,
    ) -> Result<BTreeSet<OrganizationId>, RbacError> {
        let mut ids = BTreeSet::new();
        let Some(org) = self.store.get_by_id(user_org_id).await? else {
            return Ok(ids);
        };

        ids.insert(org.id.clone());
        for ancestor in self.store.get_path(user_org_id).await? {
            ids.insert(ancestor.id);
        }
        ids.extend(self.siblings_of(&org).await?);

        Ok(ids)
    }

    /// Organizations sharing `org_id`'s direct parent, excluding `org_id`.
    /// Roots and unknown ids have none.
    pub async fn sibling_org_ids(
        &self,
        org_id: &OrganizationId,
    ) -> Result<Vec<OrganizationId>, RbacError> {
        match self.store.get_by_id(org_id).await? {
            Some(org) => self.siblings_of(&org).await,
            None => Ok(Vec::new()),
        }
    }

    async fn siblings_of(&self, org: &Organization) -> Result<Vec<OrganizationId>, RbacError> {
        let Some(parent_id) = &org.parent_id else {
            return Ok(Vec::new());
        };
        let siblings = self.store.get_children(parent_id).await?;
        Ok(siblings
            .into_iter()
            .map(|s| s.id)
            .filter(|id| id != &org.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::app::rbac::store::tests::org;
    use crate::app::rbac::InMemoryOrgStore;

    #[tokio::test]
    async fn scope_is_self_ancestors_and_siblings() {
        let acme = org("Acme", None);
        let eng = org("Engineering", Some(&acme));
        let product = org("Product", Some(&acme));
        let platform = org("Platform", Some(&eng));
        let qa = org("QA", Some(&eng));
        let ux = org("UX", Some(&product));
        let store = InMemoryOrgStore::new([
            acme.clone(),
            eng.clone(),
            product.clone(),
            platform.clone(),
            qa.clone(),
            ux.clone(),
        ]);
        let scope = AccessScopeCalculator::new(Arc::new(store));

        let ids = scope.accessible_org_ids(&platform.id).await.unwrap();
        let expected: BTreeSet<_> = [platform.id.clone(), eng.id.clone(), acme.id.clone(), qa.id]
            .into_iter()
            .collect();
        assert_eq!(ids, expected);

        // Descendants (Platform) and cousins (UX) stay out.
        let ids = scope.accessible_org_ids(&eng.id).await.unwrap();
        let expected: BTreeSet<_> = [eng.id, acme.id, product.id].into_iter().collect();
        assert_eq!(ids, expected);
        assert!(!ids.contains(&platform.id));
        assert!(!ids.contains(&ux.id));
    }

    #[tokio::test]
    async fn root_scope_is_only_itself() {
        let acme = org("Acme", None);
        let globex = org("Globex", None);
        let eng = org("Engineering", Some(&acme));
        let store = InMemoryOrgStore::new([acme.clone(), globex, eng]);
        let scope = AccessScopeCalculator::new(Arc::new(store));

        let ids = scope.accessible_org_ids(&acme.id).await.unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![acme.id.clone()]);
        assert!(scope.sibling_org_ids(&acme.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_org_has_empty_scope() {
        let scope = AccessScopeCalculator::new(Arc::new(InMemoryOrgStore::default()));
        assert!(scope
            .accessible_org_ids(&OrganizationId::new())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn siblings_exclude_self() {
        let acme = org("Acme", None);
        let eng = org("Engineering", Some(&acme));
        let product = org("Product", Some(&acme));
        let sales = org("Sales", Some(&acme));
        let store = InMemoryOrgStore::new([acme, eng.clone(), product.clone(), sales.clone()]);
        let scope = AccessScopeCalculator::new(Arc::new(store));

        let mut siblings = scope.sibling_org_ids(&eng.id).await.unwrap();
        siblings.sort();
        let mut expected = vec![product.id, sales.id];
        expected.sort();
        assert_eq!(siblings, expected);
    }
}
