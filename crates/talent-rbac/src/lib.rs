//! # Talent RBAC (Role-Based Access Control)
//!
//! This crate provides the role and capability layer of the Talent platform,
//! shared across the Pipeline, Threads, and CallDesk applications.
//!
//! ## Overview
//!
//! The talent-rbac crate handles:
//! - **Roles**: The three closed role hierarchies (global, organization,
//!   department) plus the unified capability-role axis
//! - **Permission keys**: The fixed set of ~20 permission flags
//! - **Capability table**: The static per-role capability map
//!
//! ## Architecture
//!
//! ```text
//! CapabilityRole + CapabilityContext ──capabilities()──▶ CapabilitySet
//!
//! GlobalRole  {member, sub_admin, admin, superadmin}
//! OrgRole     {member, admin, owner}
//! DeptRole    {member, sub_admin, lead}
//! ```
//!
//! The capability table is pure: it performs no storage lookups. Situational
//! inputs (department-admin status, shared department, ownership) arrive as
//! pre-computed booleans in [`CapabilityContext`].
//!
//! ## Usage
//!
//! ```rust
//! use talent_rbac::{capabilities, CapabilityContext, CapabilityRole, PermissionKey};
//!
//! let ctx = CapabilityContext { is_owner: true, ..Default::default() };
//! let caps = capabilities(CapabilityRole::Member, &ctx);
//!
//! assert!(caps.allows(PermissionKey::EditCandidates));
//! assert!(!caps.allows(PermissionKey::DeleteUsers));
//! ```
//!
//! ## Integration with talent-access
//!
//! The effective-permission resolver in `talent-access` layers custom roles,
//! per-permission overrides, and department elevation on top of this table.

pub mod capabilities;
pub mod permissions;
pub mod roles;

// Re-export main types for convenience
pub use capabilities::{capabilities, CapabilityContext};
pub use permissions::{CapabilitySet, PermissionKey};
pub use roles::{CapabilityRole, DeptRole, GlobalRole, OrgRole};
