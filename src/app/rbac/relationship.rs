use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::{RbacError, SharedOrgStore};
use crate::app::domain::OrganizationId;

/// Position of a target organization relative to the acting one.
///
/// Read as "the target is my ...": `Parent` means the target is the acting
/// org's direct parent, `Descendant` means it sits somewhere below a direct child.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgRelationship {
    #[serde(rename = "SELF")]
    #[strum(serialize = "SELF")]
    SelfOrg,
    Parent,
    Child,
    Sibling,
    Ancestor,
    Descendant,
    None,
}

impl OrgRelationship {
    pub const ALL: [OrgRelationship; 7] = [
        OrgRelationship::SelfOrg,
        OrgRelationship::Parent,
        OrgRelationship::Child,
        OrgRelationship::Sibling,
        OrgRelationship::Ancestor,
        OrgRelationship::Descendant,
        OrgRelationship::None,
    ];

    /// The relationship seen from the other side of the pair.
    pub fn inverse(self) -> Self {
        match self {
            OrgRelationship::Parent => OrgRelationship::Child,
            OrgRelationship::Child => OrgRelationship::Parent,
            OrgRelationship::Ancestor => OrgRelationship::Descendant,
            OrgRelationship::Descendant => OrgRelationship::Ancestor,
            OrgRelationship::SelfOrg | OrgRelationship::Sibling | OrgRelationship::None => self,
        }
    }
}

/// Classifies pairs of organizations against the current tree shape.
#[derive(Clone)]
pub struct RelationshipResolver {
    store: SharedOrgStore,
}

impl RelationshipResolver {
    pub fn new(store: SharedOrgStore) -> Self {
        Self { store }
    }

    /// Relationship of `target_org_id` to `user_org_id`. Ids that do not resolve
    /// yield [`OrgRelationship::None`]; checks run in order and the first match wins.
    pub async fn compute_relationship(
        &self,
        user_org_id: &OrganizationId,
        target_org_id: &OrganizationId,
    ) -> Result<OrgRelationship, RbacError> {
        if user_org_id == target_org_id {
            return Ok(OrgRelationship::SelfOrg);
        }

        let (user_org, target_org) = tokio::try_join!(
            self.store.get_by_id(user_org_id),
            self.store.get_by_id(target_org_id),
        )?;
        let (Some(user_org), Some(target_org)) = (user_org, target_org) else {
            return Ok(OrgRelationship::None);
        };

        if user_org.parent_id.as_ref() == Some(target_org_id) {
            return Ok(OrgRelationship::Parent);
        }
        if target_org.parent_id.as_ref() == Some(user_org_id) {
            return Ok(OrgRelationship::Child);
        }
        if let (Some(a), Some(b)) = (&user_org.parent_id, &target_org.parent_id) {
            if a == b {
                return Ok(OrgRelationship::Sibling);
            }
        }

        let user_path = self.store.get_path(user_org_id).await?;
        if user_path.iter().any(|o| &o.id == target_org_id) {
            return Ok(OrgRelationship::Ancestor);
        }

        let target_path = self.store.get_path(target_org_id).await?;
        if target_path.iter().any(|o| &o.id == user_org_id) {
            return Ok(OrgRelationship::Descendant);
        }

        Ok(OrgRelationship::None)
    }

    /// Whether `org_id` sits strictly above `other_id` in the same tree.
    pub async fn is_ancestor_of(
        &self,
        org_id: &OrganizationId,
        other_id: &OrganizationId,
    ) -> Result<bool, RbacError> {
        if org_id == other_id {
            return Ok(false);
        }
        let path = self.store.get_path(other_id).await?;
        Ok(path.iter().any(|o| &o.id == org_id))
    }

    /// Whether `org_id` sits strictly below `other_id` in the same tree.
    pub async fn is_descendant_of(
        &self,
        org_id: &OrganizationId,
        other_id: &OrganizationId,
    ) -> Result<bool, RbacError> {
        self.is_ancestor_of(other_id, org_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::app::domain::Organization;
    use crate::app::rbac::store::tests::org;
    use crate::app::rbac::{InMemoryOrgStore, TreeFault};

    /// Acme → {Engineering → {Platform → Core, QA}, Product → UX}, plus an unrelated root Globex.
    struct Tree {
        acme: Organization,
        eng: Organization,
        product: Organization,
        platform: Organization,
        core: Organization,
        qa: Organization,
        ux: Organization,
        globex: Organization,
        resolver: RelationshipResolver,
    }

    fn tree() -> Tree {
        let acme = org("Acme", None);
        let eng = org("Engineering", Some(&acme));
        let product = org("Product", Some(&acme));
        let platform = org("Platform", Some(&eng));
        let core = org("Core", Some(&platform));
        let qa = org("QA", Some(&eng));
        let ux = org("UX", Some(&product));
        let globex = org("Globex", None);
        let store = InMemoryOrgStore::new([
            acme.clone(),
            eng.clone(),
            product.clone(),
            platform.clone(),
            core.clone(),
            qa.clone(),
            ux.clone(),
            globex.clone(),
        ]);
        Tree {
            acme,
            eng,
            product,
            platform,
            core,
            qa,
            ux,
            globex,
            resolver: RelationshipResolver::new(Arc::new(store)),
        }
    }

    async fn rel(t: &Tree, a: &Organization, b: &Organization) -> OrgRelationship {
        t.resolver.compute_relationship(&a.id, &b.id).await.unwrap()
    }

    #[tokio::test]
    async fn same_org_is_self() {
        let t = tree();
        assert_eq!(rel(&t, &t.platform, &t.platform).await, OrgRelationship::SelfOrg);
    }

    #[tokio::test]
    async fn direct_links_are_parent_and_child() {
        let t = tree();
        assert_eq!(rel(&t, &t.eng, &t.platform).await, OrgRelationship::Child);
        assert_eq!(rel(&t, &t.platform, &t.eng).await, OrgRelationship::Parent);
    }

    #[tokio::test]
    async fn grandparent_is_ancestor() {
        let t = tree();
        assert_eq!(rel(&t, &t.platform, &t.acme).await, OrgRelationship::Ancestor);
        assert_eq!(rel(&t, &t.core, &t.acme).await, OrgRelationship::Ancestor);
        assert_eq!(rel(&t, &t.acme, &t.core).await, OrgRelationship::Descendant);
    }

    #[tokio::test]
    async fn shared_parent_is_sibling() {
        let t = tree();
        assert_eq!(rel(&t, &t.eng, &t.product).await, OrgRelationship::Sibling);
        assert_eq!(rel(&t, &t.platform, &t.qa).await, OrgRelationship::Sibling);
    }

    #[tokio::test]
    async fn cousins_and_other_trees_are_none() {
        let t = tree();
        assert_eq!(rel(&t, &t.platform, &t.ux).await, OrgRelationship::None);
        assert_eq!(rel(&t, &t.acme, &t.globex).await, OrgRelationship::None);
    }

    #[tokio::test]
    async fn roots_are_never_siblings() {
        let t = tree();
        assert_eq!(rel(&t, &t.globex, &t.acme).await, OrgRelationship::None);
    }

    #[tokio::test]
    async fn unknown_ids_resolve_to_none() {
        let t = tree();
        let ghost = OrganizationId::new();
        let r = t.resolver.compute_relationship(&t.eng.id, &ghost).await.unwrap();
        assert_eq!(r, OrgRelationship::None);
        let r = t.resolver.compute_relationship(&ghost, &t.eng.id).await.unwrap();
        assert_eq!(r, OrgRelationship::None);
    }

    #[tokio::test]
    async fn swapping_the_pair_inverts_the_relationship() {
        let t = tree();
        let all = [
            &t.acme, &t.eng, &t.product, &t.platform, &t.core, &t.qa, &t.ux, &t.globex,
        ];
        for a in all {
            for b in all {
                let forward = rel(&t, a, b).await;
                let backward = rel(&t, b, a).await;
                assert_eq!(
                    forward.inverse(),
                    backward,
                    "{} -> {} was {forward}, reverse was {backward}",
                    a.name,
                    b.name
                );
            }
        }
    }

    #[tokio::test]
    async fn ancestor_helpers_are_strict() {
        let t = tree();
        assert!(t.resolver.is_ancestor_of(&t.acme.id, &t.core.id).await.unwrap());
        assert!(t.resolver.is_descendant_of(&t.core.id, &t.eng.id).await.unwrap());
        assert!(!t.resolver.is_ancestor_of(&t.eng.id, &t.eng.id).await.unwrap());
        assert!(!t.resolver.is_ancestor_of(&t.product.id, &t.core.id).await.unwrap());
    }

    #[tokio::test]
    async fn cyclic_tree_surfaces_malformed_tree() {
        let mut a = org("A", None);
        let b = org("B", Some(&a));
        a.parent_id = Some(b.id.clone());
        let unrelated = org("Z", None);
        let store = InMemoryOrgStore::new([a.clone(), b, unrelated.clone()]);
        let resolver = RelationshipResolver::new(Arc::new(store));

        let err = resolver
            .compute_relationship(&a.id, &unrelated.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RbacError::MalformedTree {
                fault: TreeFault::Cycle,
                ..
            }
        ));
    }

    #[test]
    fn names_match_wire_tags() {
        assert_eq!(OrgRelationship::SelfOrg.to_string(), "SELF");
        assert_eq!(OrgRelationship::Descendant.to_string(), "DESCENDANT");
        assert_eq!("SIBLING".parse::<OrgRelationship>().unwrap(), OrgRelationship::Sibling);
        assert_eq!(
            serde_json::to_string(&OrgRelationship::SelfOrg).unwrap(),
            "\"SELF\""
        );
    }

    #[test]
    fn inverse_is_an_involution() {
        for r in OrgRelationship::ALL {
            assert_eq!(r.inverse().inverse(), r);
        }
    }
}
