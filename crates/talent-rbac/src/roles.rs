//! Role hierarchies
//!
//! This module defines the three closed role hierarchies used across the
//! platform: global (platform-wide), organization, and department roles.
//! Roles are always compared as enum values, never as raw strings.

use serde::{Deserialize, Serialize};

/// Platform-wide role attached to a user account.
///
/// The global role is the coarsest authority level. Most users are plain
/// `Member`s whose real authority comes from their organization and
/// department memberships; `Superadmin` bypasses every other check.
///
/// # Examples
///
/// ```
/// use talent_rbac::GlobalRole;
///
/// let role = GlobalRole::parse("sub_admin").unwrap();
/// assert_eq!(role, GlobalRole::SubAdmin);
/// assert_eq!(role.as_str(), "sub_admin");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    /// Regular platform user
    Member = 0,

    /// Limited administrative access
    SubAdmin = 1,

    /// Platform administrator
    Admin = 2,

    /// Unrestricted platform operator
    Superadmin = 3,
}

impl GlobalRole {
    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(GlobalRole)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "sub_admin" | "subadmin" => Some(Self::SubAdmin),
            "admin" => Some(Self::Admin),
            "superadmin" | "super_admin" => Some(Self::Superadmin),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::SubAdmin => "sub_admin",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::SubAdmin => "Sub-Admin",
            Self::Admin => "Admin",
            Self::Superadmin => "Superadmin",
        }
    }
}

impl Default for GlobalRole {
    fn default() -> Self {
        Self::Member
    }
}

/// User role within an organization.
///
/// The hierarchy is: Member < Admin < Owner.
///
/// # Permission Model
///
/// - **Member**: Participates in the org; access governed by department roles
///   and explicit sharing grants
/// - **Admin**: Can manage members and departments
/// - **Owner**: Full organization control, sees all org content except
///   superadmin-created records
///
/// # Examples
///
/// ```
/// use talent_rbac::OrgRole;
///
/// assert!(OrgRole::Owner.is_admin());
/// assert!(OrgRole::Admin.is_admin());
/// assert!(!OrgRole::Member.is_admin());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    /// Regular organization member
    Member = 0,

    /// Can manage members and departments
    Admin = 1,

    /// Full organization control
    Owner = 2,
}

impl OrgRole {
    /// Check if this role has organization-admin privileges.
    ///
    /// # Returns
    ///
    /// `true` for Admin and Owner roles
    pub fn is_admin(&self) -> bool {
        *self >= OrgRole::Admin
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(OrgRole)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Admin => "Admin",
            Self::Owner => "Owner",
        }
    }
}

impl Default for OrgRole {
    fn default() -> Self {
        Self::Member
    }
}

/// User role within a department.
///
/// Departments are the unit of devolved authority: a `Lead` or `SubAdmin`
/// of a department can read everything produced inside it without holding
/// any elevated organization or global role.
///
/// # Examples
///
/// ```
/// use talent_rbac::DeptRole;
///
/// assert!(DeptRole::Lead.is_admin());
/// assert!(DeptRole::SubAdmin.is_admin());
/// assert!(!DeptRole::Member.is_admin());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeptRole {
    /// Regular department member
    Member = 0,

    /// Department sub-administrator
    SubAdmin = 1,

    /// Department lead
    Lead = 2,
}

impl DeptRole {
    /// Check if this role carries department-admin authority.
    ///
    /// # Returns
    ///
    /// `true` for Lead and SubAdmin roles
    pub fn is_admin(&self) -> bool {
        *self >= DeptRole::SubAdmin
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(DeptRole)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "sub_admin" | "subadmin" => Some(Self::SubAdmin),
            "lead" => Some(Self::Lead),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::SubAdmin => "sub_admin",
            Self::Lead => "lead",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::SubAdmin => "Sub-Admin",
            Self::Lead => "Lead",
        }
    }
}

impl Default for DeptRole {
    fn default() -> Self {
        Self::Member
    }
}

/// The role axis the capability table is defined over.
///
/// This unifies the four global roles with the two department elevation
/// roles so that a single table answers "what can this role do". Custom
/// roles also name a `CapabilityRole` as their base.
///
/// # Examples
///
/// ```
/// use talent_rbac::CapabilityRole;
///
/// assert_eq!(CapabilityRole::parse("lead"), Some(CapabilityRole::DeptLead));
/// assert_eq!(CapabilityRole::parse("nonsense"), None);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityRole {
    /// Plain platform member
    Member,

    /// Global sub-admin
    SubAdmin,

    /// Global admin
    Admin,

    /// Platform operator (all capabilities)
    Superadmin,

    /// Department lead elevation
    DeptLead,

    /// Department sub-admin elevation
    DeptSubAdmin,
}

impl CapabilityRole {
    /// Parse role from string representation.
    ///
    /// Unrecognized strings yield `None`; callers treat that as a role with
    /// no capabilities rather than guessing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "sub_admin" | "subadmin" => Some(Self::SubAdmin),
            "admin" => Some(Self::Admin),
            "superadmin" | "super_admin" => Some(Self::Superadmin),
            "lead" | "dept_lead" => Some(Self::DeptLead),
            "dept_sub_admin" => Some(Self::DeptSubAdmin),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::SubAdmin => "sub_admin",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
            Self::DeptLead => "dept_lead",
            Self::DeptSubAdmin => "dept_sub_admin",
        }
    }
}

impl From<GlobalRole> for CapabilityRole {
    fn from(role: GlobalRole) -> Self {
        match role {
            GlobalRole::Member => Self::Member,
            GlobalRole::SubAdmin => Self::SubAdmin,
            GlobalRole::Admin => Self::Admin,
            GlobalRole::Superadmin => Self::Superadmin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_role_parse() {
        assert_eq!(GlobalRole::parse("superadmin"), Some(GlobalRole::Superadmin));
        assert_eq!(GlobalRole::parse("SUB_ADMIN"), Some(GlobalRole::SubAdmin));
        assert_eq!(GlobalRole::parse("invalid"), None);
    }

    #[test]
    fn test_org_role_hierarchy() {
        assert!(OrgRole::Owner > OrgRole::Admin);
        assert!(OrgRole::Admin > OrgRole::Member);
    }

    #[test]
    fn test_org_role_admin() {
        assert!(OrgRole::Owner.is_admin());
        assert!(OrgRole::Admin.is_admin());
        assert!(!OrgRole::Member.is_admin());
    }

    #[test]
    fn test_dept_role_hierarchy() {
        assert!(DeptRole::Lead > DeptRole::SubAdmin);
        assert!(DeptRole::SubAdmin > DeptRole::Member);
    }

    #[test]
    fn test_dept_role_admin() {
        assert!(DeptRole::Lead.is_admin());
        assert!(DeptRole::SubAdmin.is_admin());
        assert!(!DeptRole::Member.is_admin());
    }

    #[test]
    fn test_capability_role_from_global() {
        assert_eq!(
            CapabilityRole::from(GlobalRole::Superadmin),
            CapabilityRole::Superadmin
        );
        assert_eq!(CapabilityRole::from(GlobalRole::Member), CapabilityRole::Member);
    }

    #[test]
    fn test_capability_role_parse_roundtrip() {
        for role in [
            CapabilityRole::Member,
            CapabilityRole::SubAdmin,
            CapabilityRole::Admin,
            CapabilityRole::Superadmin,
            CapabilityRole::DeptLead,
            CapabilityRole::DeptSubAdmin,
        ] {
            assert_eq!(CapabilityRole::parse(role.as_str()), Some(role));
        }
    }
}
