//! # Capability table
//!
//! The static per-role capability map. This is the base layer of permission
//! resolution: a pure function from (role, pre-computed context) to a total
//! [`CapabilitySet`]. It performs no storage lookups of its own — callers
//! supply the few situational booleans it needs.

use serde::{Deserialize, Serialize};

use crate::permissions::{CapabilitySet, PermissionKey};
use crate::roles::CapabilityRole;

/// Pre-computed situational flags fed into the capability table.
///
/// These are resolved by the caller (typically the permission resolver)
/// before the table is consulted, so the table itself stays pure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CapabilityContext {
    /// The subject holds an admin role (lead or sub-admin) in some department
    pub is_dept_admin: bool,

    /// The subject and the object of the check share a department
    pub same_department: bool,

    /// The subject owns/created the object of the check
    pub is_owner: bool,
}

impl CapabilityContext {
    /// Context with every flag cleared.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Resolve the static capability map for a role.
///
/// `Superadmin` gets every key. The remaining rows are fixed, with the
/// context flags modulating the keys that depend on the subject's relation
/// to the object (ownership, shared department, department-admin status).
///
/// # Example
///
/// ```
/// use talent_rbac::{capabilities, CapabilityContext, CapabilityRole, PermissionKey};
///
/// let caps = capabilities(CapabilityRole::Superadmin, &CapabilityContext::none());
/// assert!(caps.allows(PermissionKey::ImpersonateUsers));
///
/// let caps = capabilities(CapabilityRole::Member, &CapabilityContext::none());
/// assert!(caps.allows(PermissionKey::ViewCandidates));
/// assert!(!caps.allows(PermissionKey::ShareResources));
/// ```
pub fn capabilities(role: CapabilityRole, ctx: &CapabilityContext) -> CapabilitySet {
    use PermissionKey::*;

    match role {
        CapabilityRole::Superadmin => CapabilitySet::all_allowed(),

        CapabilityRole::Admin => CapabilitySet::from_fn(|key| {
            !matches!(key, ImpersonateUsers | ManageFeatureFlags)
        }),

        CapabilityRole::SubAdmin => CapabilitySet::from_fn(|key| match key {
            ViewCandidates | ViewThreads | ViewCalls => true,
            CreateCandidates | EditCandidates => true,
            ShareResources | InviteMembers | AccessAdminPanel | ExportReports => true,
            ViewAllDeptData | ManageDeptMembers => ctx.is_dept_admin,
            _ => false,
        }),

        CapabilityRole::Member => CapabilitySet::from_fn(|key| match key {
            ViewCandidates | ViewThreads | ViewCalls => true,
            CreateCandidates => true,
            EditCandidates => ctx.is_owner,
            _ => false,
        }),

        CapabilityRole::DeptLead => CapabilitySet::from_fn(|key| match key {
            ViewCandidates | ViewThreads | ViewCalls => true,
            CreateCandidates | ShareResources | ExportReports => true,
            ViewAllDeptData | ManageDeptMembers => true,
            EditCandidates => ctx.is_owner || ctx.same_department,
            DeleteCandidates => ctx.is_owner,
            _ => false,
        }),

        CapabilityRole::DeptSubAdmin => CapabilitySet::from_fn(|key| match key {
            ViewCandidates | ViewThreads | ViewCalls => true,
            CreateCandidates | ShareResources | ExportReports => true,
            ViewAllDeptData => true,
            EditCandidates => ctx.is_owner || ctx.same_department,
            _ => false,
        }),
    }
}
