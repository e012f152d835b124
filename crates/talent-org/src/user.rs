//! User domain model
//!
//! Users arrive at this layer already authenticated; this model carries only
//! what access resolution needs: the global role, active status, and the
//! shadow-account linkage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use talent_rbac::GlobalRole;

/// A platform user account.
///
/// A *shadow* user is a hidden account operated on behalf of a superadmin.
/// Content created by a superadmin — through the main account or a shadow —
/// is isolated from organization owners, so both forms count as "superadmin
/// accounts" for access decisions.
///
/// # Examples
///
/// ```
/// use talent_org::User;
/// use talent_rbac::GlobalRole;
///
/// let user = User::new(GlobalRole::Member);
/// assert!(user.is_active);
/// assert!(!user.is_superadmin_account());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Platform-wide role
    pub role: GlobalRole,

    /// Whether this is a hidden shadow account
    pub is_shadow: bool,

    /// The superadmin this shadow account belongs to, if any
    pub shadow_owner_id: Option<Uuid>,

    /// Whether the account is active
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with the given global role.
    pub fn new(role: GlobalRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            is_shadow: false,
            shadow_owner_id: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Creates a shadow account owned by a superadmin.
    ///
    /// # Arguments
    ///
    /// * `owner_id` - The superadmin user this shadow account belongs to
    pub fn new_shadow(owner_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: GlobalRole::Superadmin,
            is_shadow: true,
            shadow_owner_id: Some(owner_id),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Check whether this account carries superadmin authority.
    ///
    /// True for the primary superadmin role and for shadow accounts; content
    /// created by either is hidden from organization owners.
    pub fn is_superadmin_account(&self) -> bool {
        self.role == GlobalRole::Superadmin || self.is_shadow
    }
}
