//! Pass-scoped resolution cache
//!
//! A [`ResolutionPass`] is constructed per external engine call and discarded
//! when the call returns. It memoizes store lookups keyed by (table, key) so
//! that checking many resources in one pass never repeats a query — and so
//! that nothing is ever cached across calls, where membership or grant
//! changes would make it stale.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use talent_org::{ResourceKind, ResourceRecord, SharedAccessGrant};
use talent_rbac::{DeptRole, OrgRole};

use crate::error::AccessResult;
use crate::store::{AccessStore, GrantStore, MembershipStore, ResourceStore, UserDirectory};

/// Short-lived memoized view over an [`AccessStore`].
///
/// The pass pins `now` at construction so every expiry check within one
/// resolution sees the same instant.
pub struct ResolutionPass<'a> {
    store: &'a dyn AccessStore,
    now: DateTime<Utc>,
    org_roles: HashMap<(Uuid, Uuid), Option<OrgRole>>,
    department_roles: HashMap<Uuid, Vec<(Uuid, DeptRole)>>,
    department_members: HashMap<Uuid, HashSet<Uuid>>,
    superadmins: Option<HashSet<Uuid>>,
    user_grants: HashMap<Uuid, Vec<SharedAccessGrant>>,
    resource_grants: HashMap<(ResourceKind, Uuid), Vec<SharedAccessGrant>>,
    resources: HashMap<(ResourceKind, Uuid), Option<ResourceRecord>>,
}

impl<'a> ResolutionPass<'a> {
    /// Start a new pass over `store`.
    pub fn new(store: &'a dyn AccessStore) -> Self {
        Self {
            store,
            now: Utc::now(),
            org_roles: HashMap::new(),
            department_roles: HashMap::new(),
            department_members: HashMap::new(),
            superadmins: None,
            user_grants: HashMap::new(),
            resource_grants: HashMap::new(),
            resources: HashMap::new(),
        }
    }

    /// The instant this pass was started; all expiry checks use it.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Memoized `org_role` lookup.
    pub async fn org_role(&mut self, user_id: Uuid, org_id: Uuid) -> AccessResult<Option<OrgRole>> {
        if let Some(role) = self.org_roles.get(&(user_id, org_id)) {
            return Ok(*role);
        }
        let role = self.store.org_role(user_id, org_id).await?;
        self.org_roles.insert((user_id, org_id), role);
        Ok(role)
    }

    /// Memoized department memberships of a user.
    pub async fn department_roles(&mut self, user_id: Uuid) -> AccessResult<Vec<(Uuid, DeptRole)>> {
        if let Some(roles) = self.department_roles.get(&user_id) {
            return Ok(roles.clone());
        }
        let roles = self.store.department_roles(user_id).await?;
        self.department_roles.insert(user_id, roles.clone());
        Ok(roles)
    }

    /// IDs of every department the user belongs to, any role.
    pub async fn department_ids(&mut self, user_id: Uuid) -> AccessResult<HashSet<Uuid>> {
        Ok(self
            .department_roles(user_id)
            .await?
            .into_iter()
            .map(|(dept, _)| dept)
            .collect())
    }

    /// IDs of departments where the user holds an admin role (lead or
    /// sub-admin).
    pub async fn admin_department_ids(&mut self, user_id: Uuid) -> AccessResult<HashSet<Uuid>> {
        Ok(self
            .department_roles(user_id)
            .await?
            .into_iter()
            .filter(|(_, role)| role.is_admin())
            .map(|(dept, _)| dept)
            .collect())
    }

    /// Memoized department member set.
    pub async fn department_member_ids(
        &mut self,
        department_id: Uuid,
    ) -> AccessResult<HashSet<Uuid>> {
        if let Some(members) = self.department_members.get(&department_id) {
            return Ok(members.clone());
        }
        let members = self.store.department_member_ids(department_id).await?;
        self.department_members.insert(department_id, members.clone());
        Ok(members)
    }

    /// Memoized superadmin account set.
    pub async fn superadmin_ids(&mut self) -> AccessResult<HashSet<Uuid>> {
        if let Some(ids) = &self.superadmins {
            return Ok(ids.clone());
        }
        let ids = self.store.superadmin_ids().await?;
        self.superadmins = Some(ids.clone());
        Ok(ids)
    }

    /// Grants naming `user_id` that are effective at `now()`.
    pub async fn effective_grants_for_user(
        &mut self,
        user_id: Uuid,
    ) -> AccessResult<Vec<SharedAccessGrant>> {
        if !self.user_grants.contains_key(&user_id) {
            let grants = self.store.grants_for_user(user_id).await?;
            self.user_grants.insert(user_id, grants);
        }
        let now = self.now;
        Ok(self.user_grants[&user_id]
            .iter()
            .filter(|g| g.is_effective(now))
            .cloned()
            .collect())
    }

    /// Grants on a resource that are effective at `now()`.
    pub async fn effective_grants_for_resource(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> AccessResult<Vec<SharedAccessGrant>> {
        let key = (kind, resource_id);
        if !self.resource_grants.contains_key(&key) {
            let grants = self.store.grants_for_resource(kind, resource_id).await?;
            self.resource_grants.insert(key, grants);
        }
        let now = self.now;
        Ok(self.resource_grants[&key]
            .iter()
            .filter(|g| g.is_effective(now))
            .cloned()
            .collect())
    }

    /// The effective grant on a resource naming `user_id`, if any.
    pub async fn effective_grant_for(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: Uuid,
    ) -> AccessResult<Option<SharedAccessGrant>> {
        Ok(self
            .effective_grants_for_resource(kind, resource_id)
            .await?
            .into_iter()
            .find(|g| g.granted_to == user_id))
    }

    /// Memoized resource load.
    pub async fn load(
        &mut self,
        kind: ResourceKind,
        id: Uuid,
    ) -> AccessResult<Option<ResourceRecord>> {
        let key = (kind, id);
        if let Some(record) = self.resources.get(&key) {
            return Ok(record.clone());
        }
        let record = self.store.load(kind, id).await?;
        self.resources.insert(key, record.clone());
        Ok(record)
    }
}
