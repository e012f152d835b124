//! Organization domain models
//!
//! Organizations are the top-level tenant boundary: every protected resource,
//! department, and membership is scoped to exactly one organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization represents a tenant in the multi-tenant system.
///
/// Users can belong to multiple organizations with different roles. Access
/// never crosses an organization boundary: a user with no membership in a
/// resource's organization is told the resource does not exist.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use talent_org::Organization;
///
/// let owner_id = Uuid::now_v7();
/// let org = Organization::new("Acme Recruiting", "acme-recruiting", owner_id);
/// assert_eq!(org.name, "Acme Recruiting");
/// assert!(org.is_active);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// URL-friendly slug (unique across platform)
    pub slug: String,

    /// Owner user ID (the user who created the org)
    pub owner_id: Uuid,

    /// Whether the organization is active
    pub is_active: bool,

    /// When the organization was created
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new active organization.
    ///
    /// # Arguments
    ///
    /// * `name` - The organization name
    /// * `slug` - URL-friendly slug (must be unique)
    /// * `owner_id` - The user ID who owns this organization
    pub fn new(name: impl Into<String>, slug: impl Into<String>, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            owner_id,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
