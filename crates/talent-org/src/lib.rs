//! # Talent Organization Management
//!
//! This crate provides the multi-tenant domain models of the Talent platform,
//! shared across the Pipeline, Threads, and CallDesk applications.
//!
//! ## Overview
//!
//! The talent-org crate handles:
//! - **Users**: Platform accounts, including hidden shadow accounts
//! - **Organizations**: Top-level tenant boundaries
//! - **Departments**: Nested administrative sub-divisions
//! - **Memberships**: User-organization and user-department relationships
//! - **Resources**: Candidate records, conversation threads, call recordings
//! - **Grants**: Peer-to-peer sharing with access levels and expiry
//! - **Custom roles**: Org-defined roles with per-permission overrides
//! - **Feature settings**: Org/department-scoped feature flags
//!
//! ## Architecture
//!
//! ```text
//! User
//!   ├─ OrgMembership ─────▶ Organization
//!   │                         └─ Department (tree)
//!   │                              └─ DepartmentMembership
//!   ├─ CustomRoleAssignment ─▶ CustomRole ─▶ RolePermissionOverride
//!   └─ SharedAccessGrant ──▶ CandidateRecord / ConversationThread / CallRecording
//! ```
//!
//! ## Resource capability traits
//!
//! The access evaluator in `talent-access` never inspects resources
//! structurally; it consumes them through the capability traits defined here:
//! [`OrgScoped`], [`Owned`], [`DepartmentScoped`], and [`LinkedEntity`],
//! combined in [`ProtectedResource`]. Every resource variant implements them
//! explicitly.
//!
//! ## Usage
//!
//! ```rust
//! use uuid::Uuid;
//! use talent_org::{CandidateRecord, Organization, OrgMembership};
//! use talent_rbac::OrgRole;
//!
//! let owner_id = Uuid::now_v7();
//! let org = Organization::new("Acme Recruiting", "acme-recruiting", owner_id);
//!
//! let recruiter = Uuid::now_v7();
//! let membership = OrgMembership::new(org.id, recruiter, OrgRole::Member);
//! let candidate = CandidateRecord::new(org.id, recruiter, "Jordan Doe");
//! ```

pub mod custom_role;
pub mod department;
pub mod feature;
pub mod membership;
pub mod organization;
pub mod resource;
pub mod sharing;
pub mod user;

// Re-export main types for convenience
pub use custom_role::{CustomRole, CustomRoleAssignment, RolePermissionOverride};
pub use department::Department;
pub use feature::{is_default_feature, FeatureSetting, DEFAULT_FEATURES, RESTRICTED_FEATURES};
pub use membership::{DepartmentMembership, OrgMembership};
pub use organization::Organization;
pub use resource::{
    CallRecording, CandidateRecord, ConversationThread, DepartmentScoped, LinkedEntity,
    OrgScoped, Owned, ProtectedResource, ResourceKind, ResourceRecord,
};
pub use sharing::{AccessLevel, SharedAccessGrant};
pub use user::User;
