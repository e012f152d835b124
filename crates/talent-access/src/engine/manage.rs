//! Audited management operations
//!
//! Custom roles, permission overrides, role assignments, sharing grants, and
//! feature flags are mutated only through these methods. Every operation runs
//! its authorization checks strictly before touching storage and hands the
//! store exactly one audit entry to apply atomically with the change.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use talent_org::{
    AccessLevel, CustomRole, CustomRoleAssignment, FeatureSetting, ResourceKind,
    RolePermissionOverride, SharedAccessGrant,
};
use talent_rbac::{CapabilityRole, OrgRole, PermissionKey};

use crate::audit::{AuditAction, AuditEntry};
use crate::engine::{AccessAction, AccessEngine};
use crate::error::{AccessError, AccessResult};
use crate::store::{
    FeatureStore, GrantStore, MembershipStore, ResourceStore, RoleStore, UserDirectory,
};

fn snapshot<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

impl AccessEngine {
    /// Create a custom role.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the actor lacks the role-management permission;
    /// `Conflict` if an active role with the same name already exists in the
    /// same scope.
    pub async fn create_custom_role(
        &self,
        actor_id: Uuid,
        name: &str,
        base_role: CapabilityRole,
        organization_id: Option<Uuid>,
    ) -> AccessResult<CustomRole> {
        self.require_role_manager(actor_id).await?;

        if self
            .store()
            .custom_role_by_name(organization_id, name)
            .await?
            .is_some()
        {
            return Err(AccessError::Conflict(format!(
                "custom role '{name}' already exists in this scope"
            )));
        }

        let mut role = CustomRole::new(name, base_role);
        if let Some(org_id) = organization_id {
            role = role.for_organization(org_id);
        }

        let audit = AuditEntry::new(
            actor_id,
            AuditAction::CustomRoleCreated,
            format!("custom_role:{}", role.id),
        )
        .with_after(snapshot(&role));
        self.store().insert_custom_role(role.clone(), audit).await?;

        tracing::info!(actor_id = %actor_id, role_id = %role.id, name, "Created custom role");
        Ok(role)
    }

    /// Rename a custom role and/or change its base role.
    ///
    /// # Errors
    ///
    /// `NotFound` if the role does not exist; `Conflict` if renaming to a
    /// name already taken in the same scope.
    pub async fn update_custom_role(
        &self,
        actor_id: Uuid,
        role_id: Uuid,
        name: Option<&str>,
        base_role: Option<CapabilityRole>,
    ) -> AccessResult<CustomRole> {
        self.require_role_manager(actor_id).await?;

        let mut role = self
            .store()
            .custom_role(role_id)
            .await?
            .ok_or_else(|| AccessError::NotFound(format!("custom role {role_id}")))?;
        let before = snapshot(&role);

        if let Some(name) = name {
            if name != role.name {
                if let Some(taken) = self
                    .store()
                    .custom_role_by_name(role.organization_id, name)
                    .await?
                {
                    if taken.id != role.id {
                        return Err(AccessError::Conflict(format!(
                            "custom role '{name}' already exists in this scope"
                        )));
                    }
                }
                role.name = name.to_string();
            }
        }
        if let Some(base_role) = base_role {
            role.base_role = base_role;
        }
        role.updated_at = Utc::now();

        let audit = AuditEntry::new(
            actor_id,
            AuditAction::CustomRoleUpdated,
            format!("custom_role:{role_id}"),
        )
        .with_before(before)
        .with_after(snapshot(&role));
        self.store().update_custom_role(role.clone(), audit).await?;

        tracing::info!(actor_id = %actor_id, role_id = %role_id, "Updated custom role");
        Ok(role)
    }

    /// Soft-delete a custom role.
    ///
    /// The role stops resolving immediately but its row and audit history
    /// remain.
    pub async fn deactivate_custom_role(&self, actor_id: Uuid, role_id: Uuid) -> AccessResult<()> {
        self.require_role_manager(actor_id).await?;

        let mut role = self
            .store()
            .custom_role(role_id)
            .await?
            .ok_or_else(|| AccessError::NotFound(format!("custom role {role_id}")))?;
        let before = snapshot(&role);
        role.is_active = false;
        role.updated_at = Utc::now();

        let audit = AuditEntry::new(
            actor_id,
            AuditAction::CustomRoleDeactivated,
            format!("custom_role:{role_id}"),
        )
        .with_before(before)
        .with_after(snapshot(&role));
        self.store().update_custom_role(role, audit).await?;

        tracing::info!(actor_id = %actor_id, role_id = %role_id, "Deactivated custom role");
        Ok(())
    }

    /// Set or replace a permission override on a custom role.
    ///
    /// # Errors
    ///
    /// `InvalidOverride` if `permission` is not a recognized permission key;
    /// `NotFound` if the role does not exist.
    pub async fn set_permission_override(
        &self,
        actor_id: Uuid,
        role_id: Uuid,
        permission: &str,
        allowed: bool,
    ) -> AccessResult<RolePermissionOverride> {
        self.require_role_manager(actor_id).await?;

        let key = PermissionKey::parse(permission).ok_or_else(|| {
            AccessError::InvalidOverride(format!("unknown permission key '{permission}'"))
        })?;
        if self.store().custom_role(role_id).await?.is_none() {
            return Err(AccessError::NotFound(format!("custom role {role_id}")));
        }

        let previous = self
            .store()
            .overrides_for(role_id)
            .await?
            .into_iter()
            .find(|o| o.permission == key);

        let permission_override = RolePermissionOverride::new(role_id, key, allowed);
        let mut audit = AuditEntry::new(
            actor_id,
            AuditAction::OverrideSet,
            format!("custom_role:{role_id}:{}", key.as_str()),
        )
        .with_after(snapshot(&permission_override));
        if let Some(previous) = previous {
            audit = audit.with_before(snapshot(&previous));
        }
        self.store()
            .set_override(permission_override.clone(), audit)
            .await?;

        tracing::info!(
            actor_id = %actor_id,
            role_id = %role_id,
            permission = key.as_str(),
            allowed,
            "Set permission override"
        );
        Ok(permission_override)
    }

    /// Remove a permission override, reverting the key to the base role
    /// default.
    ///
    /// # Errors
    ///
    /// `InvalidOverride` for an unknown key; `NotFound` if no such override
    /// exists.
    pub async fn remove_permission_override(
        &self,
        actor_id: Uuid,
        role_id: Uuid,
        permission: &str,
    ) -> AccessResult<()> {
        self.require_role_manager(actor_id).await?;

        let key = PermissionKey::parse(permission).ok_or_else(|| {
            AccessError::InvalidOverride(format!("unknown permission key '{permission}'"))
        })?;

        let previous = self
            .store()
            .overrides_for(role_id)
            .await?
            .into_iter()
            .find(|o| o.permission == key);

        let mut audit = AuditEntry::new(
            actor_id,
            AuditAction::OverrideRemoved,
            format!("custom_role:{role_id}:{}", key.as_str()),
        );
        if let Some(previous) = previous {
            audit = audit.with_before(snapshot(&previous));
        }
        self.store().remove_override(role_id, key, audit).await?;

        tracing::info!(
            actor_id = %actor_id,
            role_id = %role_id,
            permission = key.as_str(),
            "Removed permission override"
        );
        Ok(())
    }

    /// Bind a custom role to a user, retiring any previous binding.
    ///
    /// # Errors
    ///
    /// `NotFound` if the role or user is missing; `Conflict` if the role has
    /// been deactivated.
    pub async fn assign_custom_role(
        &self,
        actor_id: Uuid,
        role_id: Uuid,
        user_id: Uuid,
    ) -> AccessResult<CustomRoleAssignment> {
        self.require_role_manager(actor_id).await?;

        let role = self
            .store()
            .custom_role(role_id)
            .await?
            .ok_or_else(|| AccessError::NotFound(format!("custom role {role_id}")))?;
        if !role.is_active {
            return Err(AccessError::Conflict(format!(
                "custom role {role_id} is deactivated"
            )));
        }
        if self.store().user(user_id).await?.is_none() {
            return Err(AccessError::NotFound(format!("user {user_id}")));
        }

        let previous = self.store().active_assignment_for(user_id).await?;
        let assignment = CustomRoleAssignment::new(role_id, user_id).with_assigner(actor_id);

        let mut audit = AuditEntry::new(
            actor_id,
            AuditAction::RoleAssigned,
            format!("user:{user_id}"),
        )
        .with_after(snapshot(&assignment));
        if let Some(previous) = previous {
            audit = audit.with_before(snapshot(&previous));
        }
        self.store()
            .insert_assignment(assignment.clone(), audit)
            .await?;

        tracing::info!(actor_id = %actor_id, role_id = %role_id, user_id = %user_id, "Assigned custom role");
        Ok(assignment)
    }

    /// Drop a user's active custom-role binding, reverting them to their
    /// primitive role resolution.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user has no active binding.
    pub async fn unassign_custom_role(&self, actor_id: Uuid, user_id: Uuid) -> AccessResult<()> {
        self.require_role_manager(actor_id).await?;

        let previous = self
            .store()
            .active_assignment_for(user_id)
            .await?
            .ok_or_else(|| {
                AccessError::NotFound(format!("no active custom role assignment for user {user_id}"))
            })?;

        let audit = AuditEntry::new(
            actor_id,
            AuditAction::RoleUnassigned,
            format!("user:{user_id}"),
        )
        .with_before(snapshot(&previous));
        self.store().deactivate_assignments_for(user_id, audit).await?;

        tracing::info!(actor_id = %actor_id, user_id = %user_id, "Unassigned custom role");
        Ok(())
    }

    /// Share a resource with another user.
    ///
    /// Requires both a share decision from the per-resource evaluator and
    /// grantee eligibility from [`can_share_to`](Self::can_share_to). An
    /// existing grant for the same (resource, grantee) pair is updated in
    /// place rather than duplicated.
    ///
    /// # Errors
    ///
    /// `NotFound` if the resource is missing; `Forbidden` when either check
    /// denies.
    pub async fn share_resource(
        &self,
        actor_id: Uuid,
        kind: ResourceKind,
        resource_id: Uuid,
        to_user: Uuid,
        access_level: AccessLevel,
        expires_at: Option<DateTime<Utc>>,
    ) -> AccessResult<SharedAccessGrant> {
        let resource = self
            .store()
            .load(kind, resource_id)
            .await?
            .ok_or_else(|| {
                AccessError::NotFound(format!("{} {resource_id}", kind.as_str()))
            })?;

        let decision = self
            .can_access(actor_id, kind, resource_id, AccessAction::Share)
            .await?;
        if !decision.is_allowed() {
            return Err(AccessError::Forbidden(
                decision
                    .reason()
                    .unwrap_or("sharing not permitted")
                    .to_string(),
            ));
        }
        let decision = self
            .can_share_to(actor_id, to_user, resource.organization_id)
            .await?;
        if !decision.is_allowed() {
            return Err(AccessError::Forbidden(
                decision
                    .reason()
                    .unwrap_or("recipient not eligible")
                    .to_string(),
            ));
        }

        let existing = self
            .store()
            .grants_for_resource(kind, resource_id)
            .await?
            .into_iter()
            .find(|g| g.granted_to == to_user);

        let mut grant = SharedAccessGrant::new(kind, resource_id, actor_id, to_user, access_level);
        grant.expires_at = expires_at;

        let action = match &existing {
            Some(existing) => {
                // Keep the stored row's identity on update-in-place.
                grant.id = existing.id;
                grant.created_at = existing.created_at;
                AuditAction::GrantUpdated
            }
            None => AuditAction::GrantCreated,
        };

        let mut audit = AuditEntry::new(actor_id, action, format!("grant:{}", grant.id))
            .with_after(snapshot(&grant));
        if let Some(existing) = existing {
            audit = audit.with_before(snapshot(&existing));
        }
        self.store().upsert_grant(grant.clone(), audit).await?;

        tracing::info!(
            actor_id = %actor_id,
            resource = %resource_id,
            kind = kind.as_str(),
            to_user = %to_user,
            level = grant.access_level.as_str(),
            "Shared resource"
        );
        Ok(grant)
    }

    /// Revoke a sharing grant.
    ///
    /// Allowed for the user who created the grant and for anyone the
    /// evaluator allows to share the underlying resource.
    pub async fn revoke_share(&self, actor_id: Uuid, grant_id: Uuid) -> AccessResult<()> {
        let grant = self
            .store()
            .grant(grant_id)
            .await?
            .ok_or_else(|| AccessError::NotFound(format!("grant {grant_id}")))?;

        if grant.granted_by != actor_id {
            let decision = self
                .can_access(
                    actor_id,
                    grant.resource_kind,
                    grant.resource_id,
                    AccessAction::Share,
                )
                .await?;
            if !decision.is_allowed() {
                return Err(AccessError::Forbidden(
                    "only the granter or a user with share access may revoke".to_string(),
                ));
            }
        }

        let audit = AuditEntry::new(
            actor_id,
            AuditAction::GrantRevoked,
            format!("grant:{grant_id}"),
        )
        .with_before(snapshot(&grant));
        self.store().revoke_grant(grant_id, audit).await?;

        tracing::info!(actor_id = %actor_id, grant_id = %grant_id, "Revoked grant");
        Ok(())
    }

    /// Set a feature flag at org or department scope.
    ///
    /// Restricted to superadmin accounts and the organization's owner.
    pub async fn set_feature_flag(
        &self,
        actor_id: Uuid,
        org_id: Uuid,
        department_id: Option<Uuid>,
        feature: &str,
        enabled: bool,
    ) -> AccessResult<FeatureSetting> {
        let actor = self
            .store()
            .user(actor_id)
            .await?
            .ok_or_else(|| AccessError::NotFound(format!("user {actor_id}")))?;
        if !actor.is_superadmin_account()
            && self.store().org_role(actor_id, org_id).await? != Some(OrgRole::Owner)
        {
            return Err(AccessError::Forbidden(
                "feature flags can only be changed by a superadmin or the organization owner"
                    .to_string(),
            ));
        }

        let previous = match department_id {
            Some(dept) => self
                .store()
                .department_settings(org_id, feature, &[dept])
                .await?
                .into_iter()
                .next(),
            None => self.store().org_setting(org_id, feature).await?,
        };

        let setting = match department_id {
            Some(dept) => FeatureSetting::for_department(org_id, dept, feature, enabled),
            None => FeatureSetting::org_wide(org_id, feature, enabled),
        };

        let mut audit = AuditEntry::new(
            actor_id,
            AuditAction::FeatureFlagSet,
            format!("feature:{org_id}:{feature}"),
        )
        .with_after(snapshot(&setting));
        if let Some(previous) = previous {
            audit = audit.with_before(snapshot(&previous));
        }
        self.store().set_feature(setting.clone(), audit).await?;

        tracing::info!(
            actor_id = %actor_id,
            org_id = %org_id,
            feature,
            enabled,
            "Set feature flag"
        );
        Ok(setting)
    }

    /// Role management requires the manage-custom-roles capability.
    async fn require_role_manager(&self, actor_id: Uuid) -> AccessResult<()> {
        let resolved = self.effective_permissions(actor_id).await?;
        if resolved.capabilities.allows(PermissionKey::ManageCustomRoles) {
            return Ok(());
        }
        Err(AccessError::Forbidden(format!(
            "requires the {} permission",
            PermissionKey::ManageCustomRoles.as_str()
        )))
    }
}
