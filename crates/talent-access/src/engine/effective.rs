//! Effective-permission resolution
//!
//! Merges the three capability sources in priority order: an assigned custom
//! role (base row plus overrides), department elevation of a plain member,
//! and the primitive global role.

use uuid::Uuid;

use talent_rbac::{capabilities, CapabilityContext, CapabilityRole, GlobalRole};

use crate::engine::{AccessEngine, EffectivePermissions, PermissionSource};
use crate::error::{AccessError, AccessResult};
use crate::pass::ResolutionPass;
use crate::store::{RoleStore, UserDirectory};

impl AccessEngine {
    /// Resolve the full capability map for a user.
    ///
    /// Resolution order:
    /// 1. The most recently assigned **active** custom role, if any: the base
    ///    role's capability row with every override applied on top (an
    ///    override replaces the base value for its key).
    /// 2. Department elevation: a plain global member holding `lead` in any
    ///    department resolves as a department lead; failing that, `sub_admin`
    ///    resolves as a department sub-admin. The stored global role is
    ///    untouched.
    /// 3. The primitive global role.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub async fn effective_permissions(&self, user_id: Uuid) -> AccessResult<EffectivePermissions> {
        let user = self
            .store()
            .user(user_id)
            .await?
            .ok_or_else(|| AccessError::NotFound(format!("user {user_id}")))?;

        let mut pass = ResolutionPass::new(self.store());
        let dept_roles = pass.department_roles(user_id).await?;
        let is_dept_admin = dept_roles.iter().any(|(_, role)| role.is_admin());
        let ctx = CapabilityContext {
            is_dept_admin,
            ..CapabilityContext::none()
        };

        if let Some(assignment) = self.store().active_assignment_for(user_id).await? {
            if let Some(role) = self.store().custom_role(assignment.custom_role_id).await? {
                if role.is_active {
                    let mut caps = capabilities(role.base_role, &ctx);
                    for ov in self.store().overrides_for(role.id).await? {
                        caps.set(ov.permission, ov.allowed);
                    }
                    tracing::debug!(
                        user_id = %user_id,
                        role_id = %role.id,
                        "Resolved permissions from custom role"
                    );
                    return Ok(EffectivePermissions {
                        capabilities: caps,
                        source: PermissionSource::CustomRole,
                        role_id: Some(role.id),
                    });
                }
            }
        }

        if user.role == GlobalRole::Member {
            let elevated = if dept_roles.iter().any(|(_, r)| *r == talent_rbac::DeptRole::Lead) {
                Some(CapabilityRole::DeptLead)
            } else if dept_roles
                .iter()
                .any(|(_, r)| *r == talent_rbac::DeptRole::SubAdmin)
            {
                Some(CapabilityRole::DeptSubAdmin)
            } else {
                None
            };

            if let Some(role) = elevated {
                tracing::debug!(user_id = %user_id, role = role.as_str(), "Applied department elevation");
                return Ok(EffectivePermissions {
                    capabilities: capabilities(role, &ctx),
                    source: PermissionSource::DeptRole,
                    role_id: None,
                });
            }
        }

        Ok(EffectivePermissions {
            capabilities: capabilities(user.role.into(), &ctx),
            source: PermissionSource::UserRole,
            role_id: None,
        })
    }
}
