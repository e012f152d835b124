//! In-memory access store
//!
//! This is suitable for single-process applications and testing. Production
//! deployments back the store traits with the relational database; this
//! implementation mirrors its semantics, including applying each audited
//! mutation and its log append under one write lock.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use talent_org::{
    CustomRole, CustomRoleAssignment, Department, DepartmentMembership, FeatureSetting,
    Organization, OrgMembership, ResourceKind, ResourceRecord, RolePermissionOverride,
    SharedAccessGrant, User,
};
use talent_rbac::{DeptRole, OrgRole, PermissionKey};

use crate::audit::AuditEntry;
use crate::error::{AccessError, AccessResult};
use crate::store::{
    AuditSink, FeatureStore, GrantStore, MembershipStore, ResourceStore, RoleStore, UserDirectory,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    organizations: HashMap<Uuid, Organization>,
    org_memberships: Vec<OrgMembership>,
    departments: HashMap<Uuid, Department>,
    dept_memberships: Vec<DepartmentMembership>,
    resources: HashMap<(ResourceKind, Uuid), ResourceRecord>,
    grants: Vec<SharedAccessGrant>,
    custom_roles: HashMap<Uuid, CustomRole>,
    overrides: Vec<RolePermissionOverride>,
    assignments: Vec<CustomRoleAssignment>,
    feature_settings: Vec<FeatureSetting>,
    audit_log: Vec<AuditEntry>,
}

/// In-memory implementation of every store trait.
///
/// # Examples
///
/// ```
/// use talent_access::MemoryAccessStore;
/// use talent_org::User;
/// use talent_rbac::GlobalRole;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = MemoryAccessStore::new();
/// let user = User::new(GlobalRole::Member);
/// store.add_user(user.clone()).await;
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryAccessStore {
    state: RwLock<MemoryState>,
}

impl MemoryAccessStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user.
    pub async fn add_user(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Seed an organization.
    pub async fn add_organization(&self, org: Organization) {
        self.state.write().await.organizations.insert(org.id, org);
    }

    /// Seed an organization membership.
    pub async fn add_org_membership(&self, membership: OrgMembership) {
        self.state.write().await.org_memberships.push(membership);
    }

    /// Seed a department.
    pub async fn add_department(&self, department: Department) {
        self.state
            .write()
            .await
            .departments
            .insert(department.id, department);
    }

    /// Seed a department membership.
    pub async fn add_dept_membership(&self, membership: DepartmentMembership) {
        self.state.write().await.dept_memberships.push(membership);
    }

    /// Seed a resource.
    pub async fn add_resource(&self, record: ResourceRecord) {
        self.state
            .write()
            .await
            .resources
            .insert((record.kind, record.id), record);
    }

    /// Seed a grant directly, bypassing the audited upsert path.
    pub async fn add_grant(&self, grant: SharedAccessGrant) {
        self.state.write().await.grants.push(grant);
    }

    /// Seed a custom role directly.
    pub async fn add_custom_role(&self, role: CustomRole) {
        self.state.write().await.custom_roles.insert(role.id, role);
    }

    /// Seed an override directly.
    pub async fn add_override(&self, permission_override: RolePermissionOverride) {
        self.state.write().await.overrides.push(permission_override);
    }

    /// Seed a role assignment directly.
    pub async fn add_assignment(&self, assignment: CustomRoleAssignment) {
        self.state.write().await.assignments.push(assignment);
    }

    /// Seed a feature setting directly.
    pub async fn add_feature_setting(&self, setting: FeatureSetting) {
        self.state.write().await.feature_settings.push(setting);
    }
}

#[async_trait]
impl UserDirectory for MemoryAccessStore {
    async fn user(&self, id: Uuid) -> AccessResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn superadmin_ids(&self) -> AccessResult<HashSet<Uuid>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .filter(|u| u.is_superadmin_account())
            .map(|u| u.id)
            .collect())
    }
}

#[async_trait]
impl MembershipStore for MemoryAccessStore {
    async fn org_role(&self, user_id: Uuid, org_id: Uuid) -> AccessResult<Option<OrgRole>> {
        Ok(self
            .state
            .read()
            .await
            .org_memberships
            .iter()
            .find(|m| m.user_id == user_id && m.organization_id == org_id && m.is_active)
            .map(|m| m.role))
    }

    async fn org_member_ids(&self, org_id: Uuid) -> AccessResult<HashSet<Uuid>> {
        Ok(self
            .state
            .read()
            .await
            .org_memberships
            .iter()
            .filter(|m| m.organization_id == org_id && m.is_active)
            .map(|m| m.user_id)
            .collect())
    }

    async fn department_roles(&self, user_id: Uuid) -> AccessResult<Vec<(Uuid, DeptRole)>> {
        Ok(self
            .state
            .read()
            .await
            .dept_memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| (m.department_id, m.role))
            .collect())
    }

    async fn department_member_ids(&self, department_id: Uuid) -> AccessResult<HashSet<Uuid>> {
        Ok(self
            .state
            .read()
            .await
            .dept_memberships
            .iter()
            .filter(|m| m.department_id == department_id)
            .map(|m| m.user_id)
            .collect())
    }
}

#[async_trait]
impl ResourceStore for MemoryAccessStore {
    async fn load(&self, kind: ResourceKind, id: Uuid) -> AccessResult<Option<ResourceRecord>> {
        Ok(self.state.read().await.resources.get(&(kind, id)).cloned())
    }

    async fn ids_in_org(&self, kind: ResourceKind, org_id: Uuid) -> AccessResult<HashSet<Uuid>> {
        Ok(self
            .state
            .read()
            .await
            .resources
            .values()
            .filter(|r| r.kind == kind && r.organization_id == org_id)
            .map(|r| r.id)
            .collect())
    }

    async fn ids_owned_by(
        &self,
        kind: ResourceKind,
        org_id: Uuid,
        owners: &[Uuid],
    ) -> AccessResult<HashSet<Uuid>> {
        let owners: HashSet<Uuid> = owners.iter().copied().collect();
        Ok(self
            .state
            .read()
            .await
            .resources
            .values()
            .filter(|r| {
                r.kind == kind
                    && r.organization_id == org_id
                    && r.owner_id.map(|o| owners.contains(&o)).unwrap_or(false)
            })
            .map(|r| r.id)
            .collect())
    }

    async fn ids_in_departments(
        &self,
        kind: ResourceKind,
        org_id: Uuid,
        departments: &[Uuid],
    ) -> AccessResult<HashSet<Uuid>> {
        let departments: HashSet<Uuid> = departments.iter().copied().collect();
        let state = self.state.read().await;
        Ok(state
            .resources
            .values()
            .filter(|r| r.kind == kind && r.organization_id == org_id)
            .filter(|r| {
                let direct = r
                    .department_id
                    .map(|d| departments.contains(&d))
                    .unwrap_or(false);
                // Threads and calls inherit visibility through their linked
                // candidate record's department.
                let linked = r
                    .linked_candidate_id
                    .and_then(|c| state.resources.get(&(ResourceKind::CandidateRecord, c)))
                    .and_then(|c| c.department_id)
                    .map(|d| departments.contains(&d))
                    .unwrap_or(false);
                direct || linked
            })
            .map(|r| r.id)
            .collect())
    }
}

#[async_trait]
impl GrantStore for MemoryAccessStore {
    async fn grant(&self, grant_id: Uuid) -> AccessResult<Option<SharedAccessGrant>> {
        Ok(self
            .state
            .read()
            .await
            .grants
            .iter()
            .find(|g| g.id == grant_id)
            .cloned())
    }

    async fn grants_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> AccessResult<Vec<SharedAccessGrant>> {
        Ok(self
            .state
            .read()
            .await
            .grants
            .iter()
            .filter(|g| g.resource_kind == kind && g.resource_id == resource_id)
            .cloned()
            .collect())
    }

    async fn grants_for_user(&self, user_id: Uuid) -> AccessResult<Vec<SharedAccessGrant>> {
        Ok(self
            .state
            .read()
            .await
            .grants
            .iter()
            .filter(|g| g.granted_to == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_grant(&self, grant: SharedAccessGrant, audit: AuditEntry) -> AccessResult<()> {
        let mut state = self.state.write().await;
        // Uniqueness on (kind, resource, grantee): update in place.
        if let Some(existing) = state.grants.iter_mut().find(|g| {
            g.resource_kind == grant.resource_kind
                && g.resource_id == grant.resource_id
                && g.granted_to == grant.granted_to
        }) {
            existing.access_level = grant.access_level;
            existing.expires_at = grant.expires_at;
            existing.granted_by = grant.granted_by;
        } else {
            state.grants.push(grant);
        }
        state.audit_log.push(audit);
        Ok(())
    }

    async fn revoke_grant(&self, grant_id: Uuid, audit: AuditEntry) -> AccessResult<()> {
        let mut state = self.state.write().await;
        let before = state.grants.len();
        state.grants.retain(|g| g.id != grant_id);
        if state.grants.len() == before {
            return Err(AccessError::NotFound(format!("grant {grant_id}")));
        }
        state.audit_log.push(audit);
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryAccessStore {
    async fn custom_role(&self, id: Uuid) -> AccessResult<Option<CustomRole>> {
        Ok(self.state.read().await.custom_roles.get(&id).cloned())
    }

    async fn custom_role_by_name(
        &self,
        organization_id: Option<Uuid>,
        name: &str,
    ) -> AccessResult<Option<CustomRole>> {
        Ok(self
            .state
            .read()
            .await
            .custom_roles
            .values()
            .find(|r| r.is_active && r.organization_id == organization_id && r.name == name)
            .cloned())
    }

    async fn overrides_for(
        &self,
        custom_role_id: Uuid,
    ) -> AccessResult<Vec<RolePermissionOverride>> {
        Ok(self
            .state
            .read()
            .await
            .overrides
            .iter()
            .filter(|o| o.custom_role_id == custom_role_id)
            .cloned()
            .collect())
    }

    async fn active_assignment_for(
        &self,
        user_id: Uuid,
    ) -> AccessResult<Option<CustomRoleAssignment>> {
        Ok(self
            .state
            .read()
            .await
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active)
            .max_by_key(|a| a.assigned_at)
            .cloned())
    }

    async fn insert_custom_role(&self, role: CustomRole, audit: AuditEntry) -> AccessResult<()> {
        let mut state = self.state.write().await;
        state.custom_roles.insert(role.id, role);
        state.audit_log.push(audit);
        Ok(())
    }

    async fn update_custom_role(&self, role: CustomRole, audit: AuditEntry) -> AccessResult<()> {
        let mut state = self.state.write().await;
        if !state.custom_roles.contains_key(&role.id) {
            return Err(AccessError::NotFound(format!("custom role {}", role.id)));
        }
        state.custom_roles.insert(role.id, role);
        state.audit_log.push(audit);
        Ok(())
    }

    async fn set_override(
        &self,
        permission_override: RolePermissionOverride,
        audit: AuditEntry,
    ) -> AccessResult<()> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.overrides.iter_mut().find(|o| {
            o.custom_role_id == permission_override.custom_role_id
                && o.permission == permission_override.permission
        }) {
            existing.allowed = permission_override.allowed;
            existing.updated_at = permission_override.updated_at;
        } else {
            state.overrides.push(permission_override);
        }
        state.audit_log.push(audit);
        Ok(())
    }

    async fn remove_override(
        &self,
        custom_role_id: Uuid,
        permission: PermissionKey,
        audit: AuditEntry,
    ) -> AccessResult<()> {
        let mut state = self.state.write().await;
        let before = state.overrides.len();
        state
            .overrides
            .retain(|o| !(o.custom_role_id == custom_role_id && o.permission == permission));
        if state.overrides.len() == before {
            return Err(AccessError::NotFound(format!(
                "override {} on custom role {custom_role_id}",
                permission.as_str()
            )));
        }
        state.audit_log.push(audit);
        Ok(())
    }

    async fn insert_assignment(
        &self,
        assignment: CustomRoleAssignment,
        audit: AuditEntry,
    ) -> AccessResult<()> {
        let mut state = self.state.write().await;
        // One active binding per user: retire previous ones in the same
        // transaction as the insert.
        for existing in state
            .assignments
            .iter_mut()
            .filter(|a| a.user_id == assignment.user_id && a.is_active)
        {
            existing.is_active = false;
        }
        state.assignments.push(assignment);
        state.audit_log.push(audit);
        Ok(())
    }

    async fn deactivate_assignments_for(
        &self,
        user_id: Uuid,
        audit: AuditEntry,
    ) -> AccessResult<()> {
        let mut state = self.state.write().await;
        for existing in state
            .assignments
            .iter_mut()
            .filter(|a| a.user_id == user_id && a.is_active)
        {
            existing.is_active = false;
        }
        state.audit_log.push(audit);
        Ok(())
    }
}

#[async_trait]
impl FeatureStore for MemoryAccessStore {
    async fn department_settings(
        &self,
        org_id: Uuid,
        feature: &str,
        departments: &[Uuid],
    ) -> AccessResult<Vec<FeatureSetting>> {
        let departments: HashSet<Uuid> = departments.iter().copied().collect();
        Ok(self
            .state
            .read()
            .await
            .feature_settings
            .iter()
            .filter(|s| {
                s.organization_id == org_id
                    && s.feature == feature
                    && s.department_id
                        .map(|d| departments.contains(&d))
                        .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn org_setting(
        &self,
        org_id: Uuid,
        feature: &str,
    ) -> AccessResult<Option<FeatureSetting>> {
        Ok(self
            .state
            .read()
            .await
            .feature_settings
            .iter()
            .find(|s| {
                s.organization_id == org_id && s.feature == feature && s.department_id.is_none()
            })
            .cloned())
    }

    async fn set_feature(&self, setting: FeatureSetting, audit: AuditEntry) -> AccessResult<()> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.feature_settings.iter_mut().find(|s| {
            s.organization_id == setting.organization_id
                && s.feature == setting.feature
                && s.department_id == setting.department_id
        }) {
            existing.enabled = setting.enabled;
            existing.updated_at = setting.updated_at;
        } else {
            state.feature_settings.push(setting);
        }
        state.audit_log.push(audit);
        Ok(())
    }
}

#[async_trait]
impl AuditSink for MemoryAccessStore {
    async fn append_audit(&self, entry: AuditEntry) -> AccessResult<()> {
        self.state.write().await.audit_log.push(entry);
        Ok(())
    }

    async fn audit_entries(&self) -> AccessResult<Vec<AuditEntry>> {
        Ok(self.state.read().await.audit_log.clone())
    }
}
