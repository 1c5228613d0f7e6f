//! Organization-relationship and access-control engine.
//!
//! Layering, leaves first: [`store::OrgStore`] reads the forest,
//! [`relationship::RelationshipResolver`] classifies two organizations,
//! [`scope::AccessScopeCalculator`] answers "which orgs may I browse",
//! [`permissions`] maps a relationship to allowed actions, and
//! [`gate::AuthorizationGate`] composes the last two for request handlers.
//!
//! Everything here is read-only and recomputed per call; nothing is cached
//! across tree mutations.

pub mod error;
pub mod gate;
pub mod permissions;
pub mod relationship;
pub mod scope;
pub mod store;

pub use error::{RbacError, TreeFault};
pub use gate::{goal_visible_to, AuthorizationGate, Decision};
pub use permissions::{allowed_actions, has_permission, Action, Resource};
pub use relationship::{OrgRelationship, RelationshipResolver};
pub use scope::AccessScopeCalculator;
pub use store::{InMemoryOrgStore, OrgStore, SharedOrgStore, SqliteOrgStore};
