//! Audit log entries
//!
//! Every management operation (custom roles, overrides, assignments, grants,
//! feature flags) appends exactly one audit entry recording the actor, the
//! target, and before/after snapshots. Entries are written atomically with
//! the mutation they record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The kind of change an audit entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A custom role was created
    CustomRoleCreated,
    /// A custom role was updated
    CustomRoleUpdated,
    /// A custom role was deactivated (soft delete)
    CustomRoleDeactivated,
    /// A permission override was set or replaced
    OverrideSet,
    /// A permission override was removed
    OverrideRemoved,
    /// A custom role was assigned to a user
    RoleAssigned,
    /// A custom role was unassigned from a user
    RoleUnassigned,
    /// A sharing grant was created
    GrantCreated,
    /// An existing sharing grant was updated in place
    GrantUpdated,
    /// A sharing grant was revoked
    GrantRevoked,
    /// A feature flag was set
    FeatureFlagSet,
}

impl AuditAction {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomRoleCreated => "custom_role_created",
            Self::CustomRoleUpdated => "custom_role_updated",
            Self::CustomRoleDeactivated => "custom_role_deactivated",
            Self::OverrideSet => "override_set",
            Self::OverrideRemoved => "override_removed",
            Self::RoleAssigned => "role_assigned",
            Self::RoleUnassigned => "role_unassigned",
            Self::GrantCreated => "grant_created",
            Self::GrantUpdated => "grant_updated",
            Self::GrantRevoked => "grant_revoked",
            Self::FeatureFlagSet => "feature_flag_set",
        }
    }
}

/// An append-only audit log entry.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use talent_access::audit::{AuditAction, AuditEntry};
///
/// let actor = Uuid::now_v7();
/// let entry = AuditEntry::new(actor, AuditAction::GrantRevoked, "grant:123")
///     .with_before(serde_json::json!({"access_level": "edit"}));
/// assert!(entry.after.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID
    pub id: Uuid,

    /// The user who performed the change
    pub actor_id: Uuid,

    /// What kind of change happened
    pub action: AuditAction,

    /// Identifier of the changed entity, e.g. `custom_role:<uuid>`
    pub target: String,

    /// Snapshot of the entity before the change, if it existed
    pub before: Option<Value>,

    /// Snapshot of the entity after the change, if it still exists
    pub after: Option<Value>,

    /// When the change was recorded
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates a new audit entry with no snapshots.
    pub fn new(actor_id: Uuid, action: AuditAction, target: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            actor_id,
            action,
            target: target.into(),
            before: None,
            after: None,
            recorded_at: Utc::now(),
        }
    }

    /// Attach the before-change snapshot.
    pub fn with_before(mut self, before: Value) -> Self {
        self.before = Some(before);
        self
    }

    /// Attach the after-change snapshot.
    pub fn with_after(mut self, after: Value) -> Self {
        self.after = Some(after);
        self
    }
}
