//! Custom roles and permission overrides
//!
//! An organization can define named roles that inherit a base role's
//! capability row and override individual permission keys. Custom roles are
//! append-mostly: they are soft-deleted (`is_active = false`), never removed,
//! so the audit history stays reconstructible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use talent_rbac::{CapabilityRole, PermissionKey};

/// An org-defined named role with a base capability row.
///
/// `organization_id = None` marks a platform-global custom role.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use talent_org::CustomRole;
/// use talent_rbac::CapabilityRole;
///
/// let org_id = Uuid::now_v7();
/// let role = CustomRole::new("Sourcing Specialist", CapabilityRole::Member)
///     .for_organization(org_id);
/// assert!(role.is_active);
/// assert_eq!(role.organization_id, Some(org_id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRole {
    /// Unique role ID
    pub id: Uuid,

    /// Role name (unique within an organization)
    pub name: String,

    /// Base role whose capability row this role starts from
    pub base_role: CapabilityRole,

    /// Owning organization; `None` for a global role
    pub organization_id: Option<Uuid>,

    /// Soft-delete flag; inactive roles no longer resolve
    pub is_active: bool,

    /// When the role was created
    pub created_at: DateTime<Utc>,

    /// When the role was last updated
    pub updated_at: DateTime<Utc>,
}

impl CustomRole {
    /// Creates a new active global custom role.
    pub fn new(name: impl Into<String>, base_role: CapabilityRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            base_role,
            organization_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Scope the role to an organization.
    pub fn for_organization(mut self, organization_id: Uuid) -> Self {
        self.organization_id = Some(organization_id);
        self
    }
}

/// A per-permission override attached to a custom role.
///
/// An override *replaces* the base value for its key — last value wins; it is
/// not an additive flag. Removing the override reverts the key to the base
/// role default with no residue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermissionOverride {
    /// Unique override ID
    pub id: Uuid,

    /// The custom role this override belongs to
    pub custom_role_id: Uuid,

    /// The permission key being overridden
    pub permission: PermissionKey,

    /// The replacement value
    pub allowed: bool,

    /// When the override was created
    pub created_at: DateTime<Utc>,

    /// When the override was last updated
    pub updated_at: DateTime<Utc>,
}

impl RolePermissionOverride {
    /// Creates a new override.
    pub fn new(custom_role_id: Uuid, permission: PermissionKey, allowed: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            custom_role_id,
            permission,
            allowed,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Binding between a user and a custom role.
///
/// A user holds at most one effective custom role; when multiple historical
/// rows exist, the most recently assigned active one wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRoleAssignment {
    /// Unique assignment ID
    pub id: Uuid,

    /// The custom role assigned
    pub custom_role_id: Uuid,

    /// The user holding the role
    pub user_id: Uuid,

    /// When the role was assigned
    pub assigned_at: DateTime<Utc>,

    /// Who assigned the role
    pub assigned_by: Option<Uuid>,

    /// Whether the assignment is currently in force
    pub is_active: bool,
}

impl CustomRoleAssignment {
    /// Creates a new active assignment.
    pub fn new(custom_role_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            custom_role_id,
            user_id,
            assigned_at: Utc::now(),
            assigned_by: None,
            is_active: true,
        }
    }

    /// Set who assigned the role.
    pub fn with_assigner(mut self, assigner_id: Uuid) -> Self {
        self.assigned_by = Some(assigner_id);
        self
    }
}
