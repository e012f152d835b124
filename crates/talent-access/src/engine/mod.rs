//! The access-control resolution engine
//!
//! [`AccessEngine`] is the single entry point route handlers consume:
//! per-resource decisions, batch visibility sets, effective permissions,
//! feature gating, sharing eligibility, and the audited management
//! operations. The engine is side-effect-free except for the management
//! operations; every external call constructs its own
//! [`ResolutionPass`](crate::pass::ResolutionPass) and discards it on return.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use talent_rbac::CapabilitySet;

use crate::store::AccessStore;

mod batch;
mod effective;
mod evaluator;
mod features;
mod manage;
mod sharing;

/// An action attempted on a protected resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// View the resource
    Read,
    /// Modify the resource
    Write,
    /// Remove the resource
    Delete,
    /// Grant others access to the resource
    Share,
}

impl AccessAction {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Share => "share",
        }
    }

    /// Check if this action mutates the resource or its access.
    ///
    /// Department-based authority only ever grants non-mutating access.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

/// The outcome of a boolean access question.
///
/// Denials carry an optional human-readable reason derived from the
/// precedence step that matched, for audit and debug surfaces. Decisions are
/// ordinary values — a deny is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    allowed: bool,
    reason: Option<String>,
}

impl AccessDecision {
    /// An allow decision.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// A deny decision with a reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }

    /// Whether access was granted.
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// The deny reason, if this is a denial.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Which authority source produced a user's effective permissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSource {
    /// An assigned custom role (base row plus overrides)
    CustomRole,
    /// Department elevation of a plain member (lead or sub-admin)
    DeptRole,
    /// The user's primitive global role
    UserRole,
}

impl PermissionSource {
    /// Get the string representation of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomRole => "custom_role",
            Self::DeptRole => "dept_role",
            Self::UserRole => "user_role",
        }
    }
}

/// A user's fully resolved capability map and where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivePermissions {
    /// The resolved capability map
    pub capabilities: CapabilitySet,

    /// Which authority source won
    pub source: PermissionSource,

    /// The contributing custom role, when `source` is `CustomRole`
    pub role_id: Option<Uuid>,
}

/// The access-control resolution engine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use talent_access::{AccessEngine, MemoryAccessStore};
///
/// let engine = AccessEngine::new(Arc::new(MemoryAccessStore::new()));
/// # let _ = engine;
/// ```
pub struct AccessEngine {
    store: Arc<dyn AccessStore>,
}

impl AccessEngine {
    /// Create an engine over a store.
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn AccessStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_reasons() {
        let allow = AccessDecision::allow();
        assert!(allow.is_allowed());
        assert!(allow.reason().is_none());

        let deny = AccessDecision::deny("no membership in resource organization");
        assert!(!deny.is_allowed());
        assert_eq!(deny.reason(), Some("no membership in resource organization"));
    }

    #[test]
    fn test_mutating_actions() {
        assert!(!AccessAction::Read.is_mutating());
        assert!(AccessAction::Write.is_mutating());
        assert!(AccessAction::Delete.is_mutating());
        assert!(AccessAction::Share.is_mutating());
    }
}
