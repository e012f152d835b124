//! Peer-to-peer sharing grants
//!
//! A grant extends access to one resource to one user beyond what their
//! roles allow. Grants are inert once expired; they never need to be deleted
//! to lose effect, though revocation is the normal lifecycle path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resource::ResourceKind;

/// Access level carried by a sharing grant.
///
/// Ordered View < Edit < Full. Edit and Full authorize mutations; only Full
/// allows the grantee to re-share the resource.
///
/// # Examples
///
/// ```
/// use talent_org::AccessLevel;
///
/// assert!(AccessLevel::Edit.can_write());
/// assert!(!AccessLevel::View.can_write());
/// assert!(AccessLevel::Full.can_reshare());
/// assert!(!AccessLevel::Edit.can_reshare());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Read-only access
    View = 0,

    /// Read and write access
    Edit = 1,

    /// Read, write, delete, and re-share access
    Full = 2,
}

impl AccessLevel {
    /// Check if this level authorizes write/delete.
    pub fn can_write(&self) -> bool {
        *self >= AccessLevel::Edit
    }

    /// Check if this level authorizes re-sharing.
    pub fn can_reshare(&self) -> bool {
        *self >= AccessLevel::Full
    }

    /// Parse level from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    /// Get string representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Full => "full",
        }
    }
}

/// An explicit sharing grant for one resource to one user.
///
/// At most one grant exists per (resource kind, resource id, grantee);
/// re-sharing the same resource to the same user updates the existing grant
/// in place.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use chrono::Utc;
/// use talent_org::{AccessLevel, ResourceKind, SharedAccessGrant};
///
/// let grant = SharedAccessGrant::new(
///     ResourceKind::CandidateRecord,
///     Uuid::now_v7(),
///     Uuid::now_v7(),
///     Uuid::now_v7(),
///     AccessLevel::View,
/// );
/// assert!(grant.is_effective(Utc::now()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedAccessGrant {
    /// Unique grant ID
    pub id: Uuid,

    /// Kind of the shared resource
    pub resource_kind: ResourceKind,

    /// ID of the shared resource
    pub resource_id: Uuid,

    /// The user who created the grant
    pub granted_by: Uuid,

    /// The user receiving access
    pub granted_to: Uuid,

    /// Access level conveyed
    pub access_level: AccessLevel,

    /// Expiry; `None` means the grant does not expire
    pub expires_at: Option<DateTime<Utc>>,

    /// When the grant was created
    pub created_at: DateTime<Utc>,
}

impl SharedAccessGrant {
    /// Creates a new non-expiring grant.
    pub fn new(
        resource_kind: ResourceKind,
        resource_id: Uuid,
        granted_by: Uuid,
        granted_to: Uuid,
        access_level: AccessLevel,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            resource_kind,
            resource_id,
            granted_by,
            granted_to,
            access_level,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    /// Set an expiry on the grant.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check whether the grant is in effect at `now`.
    ///
    /// An expired grant behaves exactly as if it did not exist.
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expiry) => now < expiry,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn grant(level: AccessLevel) -> SharedAccessGrant {
        SharedAccessGrant::new(
            ResourceKind::CandidateRecord,
            Uuid::now_v7(),
            Uuid::now_v7(),
            Uuid::now_v7(),
            level,
        )
    }

    #[test]
    fn test_access_level_ordering() {
        assert!(AccessLevel::Full > AccessLevel::Edit);
        assert!(AccessLevel::Edit > AccessLevel::View);
    }

    #[test]
    fn test_level_capabilities() {
        assert!(!AccessLevel::View.can_write());
        assert!(AccessLevel::Edit.can_write());
        assert!(AccessLevel::Full.can_write());
        assert!(!AccessLevel::Edit.can_reshare());
        assert!(AccessLevel::Full.can_reshare());
    }

    #[test]
    fn test_grant_without_expiry_is_effective() {
        assert!(grant(AccessLevel::View).is_effective(Utc::now()));
    }

    #[test]
    fn test_expired_grant_is_inert() {
        let now = Utc::now();
        let g = grant(AccessLevel::Full).with_expiry(now - Duration::hours(1));
        assert!(!g.is_effective(now));

        let g = grant(AccessLevel::Full).with_expiry(now + Duration::hours(1));
        assert!(g.is_effective(now));
    }
}
