//! Grantee eligibility for sharing
//!
//! [`AccessEngine::can_share_to`] governs who may be *named* in a grant; it
//! says nothing about whether the sender may share the underlying resource.
//! Both this check and a share decision from the per-resource evaluator are
//! required before a grant is created.

use uuid::Uuid;

use talent_rbac::OrgRole;

use crate::engine::{AccessDecision, AccessEngine};
use crate::error::AccessResult;
use crate::pass::ResolutionPass;
use crate::store::UserDirectory;

impl AccessEngine {
    /// Decide whether `from_user` may name `to_user` as a grant recipient
    /// within `org_id`.
    ///
    /// The recipient must be a member of the organization; past that, the
    /// first matching sender rule wins:
    /// - superadmin or organization owner: any member;
    /// - org admin: privileged recipients (owner, superadmin, another org
    ///   admin) or anyone sharing a department with the sender;
    /// - department lead or sub-admin: privileged recipients, another
    ///   department admin anywhere, or a member of one of the sender's admin
    ///   departments;
    /// - plain member: only someone sharing a department with the sender.
    pub async fn can_share_to(
        &self,
        from_user: Uuid,
        to_user: Uuid,
        org_id: Uuid,
    ) -> AccessResult<AccessDecision> {
        let sender = match self.store().user(from_user).await? {
            Some(user) if user.is_active => user,
            _ => return Ok(AccessDecision::deny("unknown or inactive sender")),
        };

        let mut pass = ResolutionPass::new(self.store());

        // The recipient must belong to the organization, whoever asks.
        let recipient_role = match pass.org_role(to_user, org_id).await? {
            Some(role) => role,
            None => {
                return Ok(AccessDecision::deny(
                    "recipient is not a member of the organization",
                ))
            }
        };

        if sender.is_superadmin_account() {
            return Ok(AccessDecision::allow());
        }

        let sender_org_role = pass.org_role(from_user, org_id).await?;
        if sender_org_role == Some(OrgRole::Owner) {
            return Ok(AccessDecision::allow());
        }

        let superadmins = pass.superadmin_ids().await?;
        let recipient_privileged =
            recipient_role == OrgRole::Owner || superadmins.contains(&to_user);

        if sender_org_role == Some(OrgRole::Admin) {
            if recipient_privileged
                || recipient_role == OrgRole::Admin
                || self.share_department(&mut pass, from_user, to_user).await?
            {
                return Ok(AccessDecision::allow());
            }
            return Ok(AccessDecision::deny(
                "recipient is outside the admin's departments",
            ));
        }

        let sender_admin_depts = pass.admin_department_ids(from_user).await?;
        if !sender_admin_depts.is_empty() {
            if recipient_privileged || recipient_role == OrgRole::Admin {
                return Ok(AccessDecision::allow());
            }
            let recipient_roles = pass.department_roles(to_user).await?;
            if recipient_roles.iter().any(|(_, role)| role.is_admin()) {
                return Ok(AccessDecision::allow());
            }
            if recipient_roles
                .iter()
                .any(|(dept, _)| sender_admin_depts.contains(dept))
            {
                return Ok(AccessDecision::allow());
            }
            return Ok(AccessDecision::deny(
                "recipient is outside the sender's admin departments",
            ));
        }

        if self.share_department(&mut pass, from_user, to_user).await? {
            return Ok(AccessDecision::allow());
        }
        Ok(AccessDecision::deny(
            "recipient shares no department with the sender",
        ))
    }

    async fn share_department(
        &self,
        pass: &mut ResolutionPass<'_>,
        a: Uuid,
        b: Uuid,
    ) -> AccessResult<bool> {
        let a_depts = pass.department_ids(a).await?;
        if a_depts.is_empty() {
            return Ok(false);
        }
        let b_depts = pass.department_ids(b).await?;
        Ok(a_depts.iter().any(|d| b_depts.contains(d)))
    }
}
