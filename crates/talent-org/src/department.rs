//! Department domain model
//!
//! Departments are administrative sub-divisions of an organization and may be
//! nested into a tree (never a cycle). They are the unit of devolved
//! authority: lead/sub-admin roles are granted per department.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A department within an organization.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use talent_org::Department;
///
/// let org_id = Uuid::now_v7();
/// let engineering = Department::new(org_id, "Engineering");
/// let hiring = Department::new(org_id, "Hiring").with_parent(engineering.id);
/// assert_eq!(hiring.parent_id, Some(engineering.id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    /// Unique department ID
    pub id: Uuid,

    /// Organization this department belongs to
    pub organization_id: Uuid,

    /// Parent department for nested departments, if any
    pub parent_id: Option<Uuid>,

    /// Human-readable name
    pub name: String,

    /// When the department was created
    pub created_at: DateTime<Utc>,
}

impl Department {
    /// Creates a new top-level department.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The owning organization
    /// * `name` - The department name
    pub fn new(organization_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            parent_id: None,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Nest this department under a parent.
    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}
