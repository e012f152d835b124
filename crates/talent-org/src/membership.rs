//! Membership domain models
//!
//! This module provides membership entities that link users to organizations
//! and departments. Memberships are created by explicit admin actions or
//! invitation acceptance and cascade-deleted with their owning user, org, or
//! department.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use talent_rbac::{DeptRole, OrgRole};

/// Organization membership linking a user to an organization.
///
/// Unique per (organization, user).
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use talent_org::OrgMembership;
/// use talent_rbac::OrgRole;
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let membership = OrgMembership::new(org_id, user_id, OrgRole::Member);
/// assert!(membership.is_active);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgMembership {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: OrgRole,

    /// When the user joined
    pub joined_at: DateTime<Utc>,

    /// Who invited this user (if applicable)
    pub invited_by: Option<Uuid>,

    /// Whether the membership is active
    pub is_active: bool,
}

impl OrgMembership {
    /// Creates a new active organization membership.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The organization ID
    /// * `user_id` - The user ID
    /// * `role` - The user's role in the organization
    pub fn new(organization_id: Uuid, user_id: Uuid, role: OrgRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            user_id,
            role,
            joined_at: Utc::now(),
            invited_by: None,
            is_active: true,
        }
    }

    /// Set who invited this user.
    pub fn with_inviter(mut self, inviter_id: Uuid) -> Self {
        self.invited_by = Some(inviter_id);
        self
    }
}

/// Department membership linking a user to a department.
///
/// Unique per (department, user). Lead and sub-admin roles carry devolved
/// read authority over the department's content.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use talent_org::DepartmentMembership;
/// use talent_rbac::DeptRole;
///
/// let dept_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let membership = DepartmentMembership::new(dept_id, user_id, DeptRole::Lead);
/// assert!(membership.role.is_admin());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentMembership {
    /// Unique membership ID
    pub id: Uuid,

    /// Department ID
    pub department_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the department
    pub role: DeptRole,

    /// When the user was added
    pub added_at: DateTime<Utc>,

    /// Who added this user (if applicable)
    pub added_by: Option<Uuid>,
}

impl DepartmentMembership {
    /// Creates a new department membership.
    ///
    /// # Arguments
    ///
    /// * `department_id` - The department ID
    /// * `user_id` - The user ID
    /// * `role` - The user's role in the department
    pub fn new(department_id: Uuid, user_id: Uuid, role: DeptRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            department_id,
            user_id,
            role,
            added_at: Utc::now(),
            added_by: None,
        }
    }

    /// Set who added this user to the department.
    pub fn with_adder(mut self, adder_id: Uuid) -> Self {
        self.added_by = Some(adder_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_membership_creation() {
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let membership = OrgMembership::new(org_id, user_id, OrgRole::Admin);

        assert_eq!(membership.organization_id, org_id);
        assert_eq!(membership.user_id, user_id);
        assert_eq!(membership.role, OrgRole::Admin);
        assert!(membership.is_active);
    }

    #[test]
    fn test_org_membership_with_inviter() {
        let inviter_id = Uuid::now_v7();
        let membership = OrgMembership::new(Uuid::now_v7(), Uuid::now_v7(), OrgRole::Member)
            .with_inviter(inviter_id);
        assert_eq!(membership.invited_by, Some(inviter_id));
    }

    #[test]
    fn test_department_membership_creation() {
        let dept_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let membership = DepartmentMembership::new(dept_id, user_id, DeptRole::SubAdmin);

        assert_eq!(membership.department_id, dept_id);
        assert_eq!(membership.role, DeptRole::SubAdmin);
        assert!(membership.role.is_admin());
    }
}
