//! Store traits consumed by the resolution engine
//!
//! The engine reads users, memberships, resources, grants, custom roles, and
//! feature settings through these traits and never touches persistence
//! directly. Audited mutations take their [`AuditEntry`] as an argument so an
//! implementation can apply the change and the log append in one transaction
//! — both succeed or neither does.

use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

use talent_org::{
    CustomRole, CustomRoleAssignment, FeatureSetting, ResourceKind, ResourceRecord,
    RolePermissionOverride, SharedAccessGrant, User,
};
use talent_rbac::{DeptRole, OrgRole, PermissionKey};

use crate::audit::AuditEntry;
use crate::error::AccessResult;

/// Lookup of user accounts and the superadmin account set.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Load a user by ID.
    async fn user(&self, id: Uuid) -> AccessResult<Option<User>>;

    /// IDs of every superadmin account, primary and shadow.
    ///
    /// Used for shadow-content isolation: content owned by any of these
    /// accounts is hidden from organization owners' listings.
    async fn superadmin_ids(&self) -> AccessResult<HashSet<Uuid>>;
}

/// Lookup of organization and department memberships.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// The user's active role in an organization, if any.
    async fn org_role(&self, user_id: Uuid, org_id: Uuid) -> AccessResult<Option<OrgRole>>;

    /// All active member IDs of an organization.
    async fn org_member_ids(&self, org_id: Uuid) -> AccessResult<HashSet<Uuid>>;

    /// Every department membership the user holds, as (department, role).
    async fn department_roles(&self, user_id: Uuid) -> AccessResult<Vec<(Uuid, DeptRole)>>;

    /// All member IDs of a department.
    async fn department_member_ids(&self, department_id: Uuid) -> AccessResult<HashSet<Uuid>>;
}

/// Lookup of protected resources, flattened to [`ResourceRecord`].
///
/// The set queries exist so the batch resolver can work in set algebra
/// instead of probing resources one by one; a relational implementation
/// backs each of them with an indexed query.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Load one resource.
    async fn load(&self, kind: ResourceKind, id: Uuid) -> AccessResult<Option<ResourceRecord>>;

    /// IDs of all resources of `kind` in an organization.
    async fn ids_in_org(&self, kind: ResourceKind, org_id: Uuid) -> AccessResult<HashSet<Uuid>>;

    /// IDs of resources of `kind` in `org_id` owned by any of `owners`.
    async fn ids_owned_by(
        &self,
        kind: ResourceKind,
        org_id: Uuid,
        owners: &[Uuid],
    ) -> AccessResult<HashSet<Uuid>>;

    /// IDs of resources of `kind` in `org_id` filed under any of
    /// `departments`, either directly or through their linked candidate
    /// record's department.
    async fn ids_in_departments(
        &self,
        kind: ResourceKind,
        org_id: Uuid,
        departments: &[Uuid],
    ) -> AccessResult<HashSet<Uuid>>;
}

/// Storage for sharing grants.
///
/// At most one grant exists per (resource kind, resource id, grantee);
/// `upsert_grant` updates the existing row in place instead of inserting a
/// duplicate.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Load one grant by ID.
    async fn grant(&self, grant_id: Uuid) -> AccessResult<Option<SharedAccessGrant>>;

    /// All grants naming a resource, including expired ones.
    ///
    /// Expiry filtering happens in the engine so that decision logic owns
    /// the notion of "effective".
    async fn grants_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> AccessResult<Vec<SharedAccessGrant>>;

    /// All grants naming a user as grantee, including expired ones.
    async fn grants_for_user(&self, user_id: Uuid) -> AccessResult<Vec<SharedAccessGrant>>;

    /// Insert or update-in-place a grant, appending `audit` atomically.
    async fn upsert_grant(&self, grant: SharedAccessGrant, audit: AuditEntry) -> AccessResult<()>;

    /// Delete a grant, appending `audit` atomically.
    async fn revoke_grant(&self, grant_id: Uuid, audit: AuditEntry) -> AccessResult<()>;
}

/// Storage for custom roles, overrides, and role assignments.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Load one custom role by ID.
    async fn custom_role(&self, id: Uuid) -> AccessResult<Option<CustomRole>>;

    /// Find an active custom role by name within an org scope.
    async fn custom_role_by_name(
        &self,
        organization_id: Option<Uuid>,
        name: &str,
    ) -> AccessResult<Option<CustomRole>>;

    /// All overrides attached to a custom role.
    async fn overrides_for(&self, custom_role_id: Uuid)
        -> AccessResult<Vec<RolePermissionOverride>>;

    /// The most recently assigned active custom-role binding for a user.
    async fn active_assignment_for(
        &self,
        user_id: Uuid,
    ) -> AccessResult<Option<CustomRoleAssignment>>;

    /// Insert a new custom role, appending `audit` atomically.
    async fn insert_custom_role(&self, role: CustomRole, audit: AuditEntry) -> AccessResult<()>;

    /// Replace a custom role row, appending `audit` atomically.
    async fn update_custom_role(&self, role: CustomRole, audit: AuditEntry) -> AccessResult<()>;

    /// Set or replace the override for (role, key), appending `audit`
    /// atomically.
    async fn set_override(
        &self,
        permission_override: RolePermissionOverride,
        audit: AuditEntry,
    ) -> AccessResult<()>;

    /// Remove the override for (role, key), appending `audit` atomically.
    ///
    /// Returns `NotFound` if no such override exists.
    async fn remove_override(
        &self,
        custom_role_id: Uuid,
        permission: PermissionKey,
        audit: AuditEntry,
    ) -> AccessResult<()>;

    /// Insert a role assignment, deactivating any previous active
    /// assignments for the same user in the same transaction.
    async fn insert_assignment(
        &self,
        assignment: CustomRoleAssignment,
        audit: AuditEntry,
    ) -> AccessResult<()>;

    /// Deactivate all active assignments for a user, appending `audit`
    /// atomically.
    async fn deactivate_assignments_for(
        &self,
        user_id: Uuid,
        audit: AuditEntry,
    ) -> AccessResult<()>;
}

/// Storage for feature flag settings.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Department-scoped rows for `feature` within the given departments.
    async fn department_settings(
        &self,
        org_id: Uuid,
        feature: &str,
        departments: &[Uuid],
    ) -> AccessResult<Vec<FeatureSetting>>;

    /// The org-wide row (department = none) for `feature`, if any.
    async fn org_setting(&self, org_id: Uuid, feature: &str)
        -> AccessResult<Option<FeatureSetting>>;

    /// Insert or replace a feature setting, appending `audit` atomically.
    async fn set_feature(&self, setting: FeatureSetting, audit: AuditEntry) -> AccessResult<()>;
}

/// Append-only audit log.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one entry.
    async fn append_audit(&self, entry: AuditEntry) -> AccessResult<()>;

    /// Read back all entries, oldest first.
    async fn audit_entries(&self) -> AccessResult<Vec<AuditEntry>>;
}

/// Everything the engine needs from storage, as one object-safe bundle.
pub trait AccessStore:
    UserDirectory + MembershipStore + ResourceStore + GrantStore + RoleStore + FeatureStore + AuditSink
{
}

impl<T> AccessStore for T where
    T: UserDirectory
        + MembershipStore
        + ResourceStore
        + GrantStore
        + RoleStore
        + FeatureStore
        + AuditSink
{
}
