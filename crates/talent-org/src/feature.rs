//! Feature flag settings
//!
//! Restricted features are opt-in per organization, with optional
//! department-level rows that take precedence over the org-wide default.
//! A department row — even a disabled one — fully overrides the org-wide
//! setting for members of that department.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Features every organization gets without configuration.
pub const DEFAULT_FEATURES: &[&str] = &["candidate_search", "conversations", "call_playback"];

/// Restricted features known to the platform (opt-in via [`FeatureSetting`]).
pub const RESTRICTED_FEATURES: &[&str] = &[
    "ai_summaries",
    "call_transcription",
    "analytics_dashboard",
    "report_export",
    "telegram_bot",
];

/// Check whether a feature is in the always-on default set.
pub fn is_default_feature(feature: &str) -> bool {
    DEFAULT_FEATURES.contains(&feature)
}

/// A feature flag row for an organization or one of its departments.
///
/// `department_id = None` is the org-wide default; a row with a department
/// set applies only to that department and suppresses the org-wide fallback
/// for its members regardless of its `enabled` value.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use talent_org::FeatureSetting;
///
/// let org_id = Uuid::now_v7();
/// let setting = FeatureSetting::org_wide(org_id, "ai_summaries", true);
/// assert!(setting.department_id.is_none());
/// assert!(setting.enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSetting {
    /// Unique setting ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Department scope; `None` means org-wide default
    pub department_id: Option<Uuid>,

    /// Feature name
    pub feature: String,

    /// Whether the feature is enabled at this scope
    pub enabled: bool,

    /// When the setting was last updated
    pub updated_at: DateTime<Utc>,
}

impl FeatureSetting {
    /// Creates an org-wide feature setting.
    pub fn org_wide(organization_id: Uuid, feature: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            department_id: None,
            feature: feature.into(),
            enabled,
            updated_at: Utc::now(),
        }
    }

    /// Creates a department-scoped feature setting.
    pub fn for_department(
        organization_id: Uuid,
        department_id: Uuid,
        feature: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            department_id: Some(department_id),
            feature: feature.into(),
            enabled,
            updated_at: Utc::now(),
        }
    }
}
