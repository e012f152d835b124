//! # Permissions
//!
//! The closed permission-key set and the capability map built over it.
//! Every role resolves to a [`CapabilitySet`]: a total map from each
//! [`PermissionKey`] to an allow/deny flag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A permission key in the platform's closed permission set.
///
/// Keys are fixed at compile time; there is no dynamic registration. Custom
/// roles override individual keys but can never introduce new ones.
///
/// # Example
///
/// ```
/// use talent_rbac::PermissionKey;
///
/// let key = PermissionKey::parse("can_share_resources").unwrap();
/// assert_eq!(key, PermissionKey::ShareResources);
/// assert_eq!(key.as_str(), "can_share_resources");
/// assert_eq!(PermissionKey::all().len(), 20);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKey {
    /// View candidate records
    ViewCandidates,
    /// View conversation threads
    ViewThreads,
    /// View call recordings
    ViewCalls,
    /// Create candidate records
    CreateCandidates,
    /// Edit candidate records
    EditCandidates,
    /// Delete candidate records
    DeleteCandidates,
    /// Share resources with other users
    ShareResources,
    /// Transfer resource ownership
    TransferResources,
    /// Delete user accounts
    DeleteUsers,
    /// Invite new members
    InviteMembers,
    /// View data across the whole department
    ViewAllDeptData,
    /// Manage department membership
    ManageDeptMembers,
    /// Create/restructure departments
    ManageDepartments,
    /// Impersonate other users
    ImpersonateUsers,
    /// Access the admin panel
    AccessAdminPanel,
    /// Manage organization settings
    ManageOrgSettings,
    /// Manage custom roles and overrides
    ManageCustomRoles,
    /// Manage feature flags
    ManageFeatureFlags,
    /// View the audit log
    ViewAuditLog,
    /// Export reports
    ExportReports,
}

impl PermissionKey {
    /// Get the string representation of the key (the stored form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewCandidates => "can_view_candidates",
            Self::ViewThreads => "can_view_threads",
            Self::ViewCalls => "can_view_calls",
            Self::CreateCandidates => "can_create_candidates",
            Self::EditCandidates => "can_edit_candidates",
            Self::DeleteCandidates => "can_delete_candidates",
            Self::ShareResources => "can_share_resources",
            Self::TransferResources => "can_transfer_resources",
            Self::DeleteUsers => "can_delete_users",
            Self::InviteMembers => "can_invite_members",
            Self::ViewAllDeptData => "can_view_all_dept_data",
            Self::ManageDeptMembers => "can_manage_dept_members",
            Self::ManageDepartments => "can_manage_departments",
            Self::ImpersonateUsers => "can_impersonate_users",
            Self::AccessAdminPanel => "can_access_admin_panel",
            Self::ManageOrgSettings => "can_manage_org_settings",
            Self::ManageCustomRoles => "can_manage_custom_roles",
            Self::ManageFeatureFlags => "can_manage_feature_flags",
            Self::ViewAuditLog => "can_view_audit_log",
            Self::ExportReports => "can_export_reports",
        }
    }

    /// Parse a permission key from its stored string form.
    ///
    /// # Returns
    ///
    /// `Some(PermissionKey)` if the string names a known key, `None`
    /// otherwise. Unknown keys are rejected at the management boundary
    /// before any override is persisted.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|key| key.as_str() == s)
    }

    /// Get all permission keys.
    pub fn all() -> Vec<Self> {
        vec![
            Self::ViewCandidates,
            Self::ViewThreads,
            Self::ViewCalls,
            Self::CreateCandidates,
            Self::EditCandidates,
            Self::DeleteCandidates,
            Self::ShareResources,
            Self::TransferResources,
            Self::DeleteUsers,
            Self::InviteMembers,
            Self::ViewAllDeptData,
            Self::ManageDeptMembers,
            Self::ManageDepartments,
            Self::ImpersonateUsers,
            Self::AccessAdminPanel,
            Self::ManageOrgSettings,
            Self::ManageCustomRoles,
            Self::ManageFeatureFlags,
            Self::ViewAuditLog,
            Self::ExportReports,
        ]
    }
}

/// A resolved capability map: every [`PermissionKey`] mapped to allow/deny.
///
/// Unlike a sparse permission set, a `CapabilitySet` is total — querying any
/// key always yields a definite answer, which is what lets overrides replace
/// values instead of accumulating.
///
/// # Example
///
/// ```
/// use talent_rbac::{CapabilitySet, PermissionKey};
///
/// let mut caps = CapabilitySet::none();
/// assert!(!caps.allows(PermissionKey::ShareResources));
///
/// caps.set(PermissionKey::ShareResources, true);
/// assert!(caps.allows(PermissionKey::ShareResources));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// Allow/deny flag per permission key.
    flags: BTreeMap<PermissionKey, bool>,
}

impl CapabilitySet {
    /// Build a capability set by evaluating a predicate for every key.
    pub fn from_fn(f: impl Fn(PermissionKey) -> bool) -> Self {
        Self {
            flags: PermissionKey::all().into_iter().map(|k| (k, f(k))).collect(),
        }
    }

    /// A capability set with every key denied.
    pub fn none() -> Self {
        Self::from_fn(|_| false)
    }

    /// A capability set with every key allowed.
    pub fn all_allowed() -> Self {
        Self::from_fn(|_| true)
    }

    /// Check whether a key is allowed.
    pub fn allows(&self, key: PermissionKey) -> bool {
        self.flags.get(&key).copied().unwrap_or(false)
    }

    /// Set the flag for a key, replacing the previous value.
    pub fn set(&mut self, key: PermissionKey, allowed: bool) {
        self.flags.insert(key, allowed);
    }

    /// Iterate over all (key, allowed) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PermissionKey, bool)> + '_ {
        self.flags.iter().map(|(k, v)| (*k, *v))
    }

    /// Count of allowed keys.
    pub fn allowed_count(&self) -> usize {
        self.flags.values().filter(|v| **v).count()
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse_roundtrip() {
        for key in PermissionKey::all() {
            assert_eq!(PermissionKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(PermissionKey::parse("can_fly"), None);
    }

    #[test]
    fn test_key_count() {
        assert_eq!(PermissionKey::all().len(), 20);
    }

    #[test]
    fn test_capability_set_total() {
        let caps = CapabilitySet::none();
        // Every key answers, even when nothing was set explicitly.
        for key in PermissionKey::all() {
            assert!(!caps.allows(key));
        }
        assert_eq!(caps.iter().count(), 20);
    }

    #[test]
    fn test_capability_set_all_allowed() {
        let caps = CapabilitySet::all_allowed();
        assert_eq!(caps.allowed_count(), 20);
    }

    #[test]
    fn test_capability_set_replaces() {
        let mut caps = CapabilitySet::all_allowed();
        caps.set(PermissionKey::DeleteUsers, false);
        assert!(!caps.allows(PermissionKey::DeleteUsers));
        caps.set(PermissionKey::DeleteUsers, true);
        assert!(caps.allows(PermissionKey::DeleteUsers));
        assert_eq!(caps.iter().count(), 20);
    }
}
