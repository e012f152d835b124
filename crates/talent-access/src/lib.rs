//! # Talent Access
//!
//! Access-control resolution engine for the Talent platform, shared across
//! the recruiting, conversation, and call-recording surfaces.
//!
//! ## Overview
//!
//! The talent-access crate answers every authorization question the route
//! handlers ask:
//! - **Per-resource decisions**: may this user read/write/delete/share this
//!   candidate record, conversation thread, or call recording?
//! - **Batch visibility**: the full set of resource IDs a user may list,
//!   computed in set algebra rather than per-resource probing
//! - **Effective permissions**: a user's resolved capability map, merging
//!   custom roles, department elevation, and the primitive global role
//! - **Feature gating**: default vs. restricted features with
//!   department-over-org precedence
//! - **Sharing eligibility**: who may be named as a grant recipient
//! - **Audited management**: custom roles, overrides, assignments, grants,
//!   and feature flags, each mutation atomic with its audit entry
//!
//! ## Architecture
//!
//! ```text
//! AccessEngine
//!   ├── ResolutionPass      per-call memoized store view
//!   └── AccessStore         object-safe bundle of store traits
//!         ├── UserDirectory, MembershipStore, ResourceStore
//!         ├── GrantStore, RoleStore, FeatureStore
//!         └── AuditSink
//! ```
//!
//! Every external engine call builds one [`pass::ResolutionPass`] and
//! discards it on return, so repeated lookups within a call hit memory while
//! nothing is ever cached across calls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uuid::Uuid;
//! use talent_access::{AccessAction, AccessEngine, MemoryAccessStore};
//! use talent_org::ResourceKind;
//!
//! # async fn example() -> Result<(), talent_access::AccessError> {
//! let engine = AccessEngine::new(Arc::new(MemoryAccessStore::new()));
//!
//! let user_id = Uuid::now_v7();
//! let resource_id = Uuid::now_v7();
//! let decision = engine
//!     .can_access(user_id, ResourceKind::CandidateRecord, resource_id, AccessAction::Read)
//!     .await?;
//! if !decision.is_allowed() {
//!     println!("denied: {:?}", decision.reason());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Integration with talent-org and talent-rbac
//!
//! Domain models (users, memberships, resources, grants, custom roles) live
//! in `talent-org`; the static role capability table lives in `talent-rbac`.
//! This crate depends on both and adds the resolution logic and storage
//! seams.

pub mod audit;
pub mod engine;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod pass;
pub mod store;

// Re-export main types for convenience
pub use audit::{AuditAction, AuditEntry};
pub use engine::{
    AccessAction, AccessDecision, AccessEngine, EffectivePermissions, PermissionSource,
};
pub use error::{AccessError, AccessResult};
#[cfg(feature = "memory")]
pub use memory::MemoryAccessStore;
pub use pass::ResolutionPass;
pub use store::AccessStore;
