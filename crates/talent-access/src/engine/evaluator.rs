//! Per-resource access evaluation
//!
//! The precedence ladder is deterministic and short-circuiting; the first
//! matching step decides. Department-based authority never authorizes a
//! mutating action — only read.

use uuid::Uuid;

use talent_org::{DepartmentScoped, LinkedEntity, Owned, ResourceKind, ResourceRecord};
use talent_rbac::OrgRole;

use crate::engine::{AccessAction, AccessDecision, AccessEngine};
use crate::error::AccessResult;
use crate::pass::ResolutionPass;
use crate::store::UserDirectory;

impl AccessEngine {
    /// Decide whether `user_id` may perform `action` on a resource.
    ///
    /// Evaluated strictly in this order:
    /// 1. Global superadmin: allow, any action.
    /// 2. No membership in the resource's organization: deny (reported as
    ///    not-found at the API layer so existence never leaks across
    ///    tenants).
    /// 3. Organization owner: read always; mutations unless the resource was
    ///    created by a superadmin account (shadow-content isolation).
    /// 4. Resource owner/creator: allow, any action.
    /// 5. Write/delete require an effective grant at edit or full level;
    ///    share requires full.
    /// 6. Read falls through to department authority: an admin department of
    ///    the user matching the resource's department, its linked candidate's
    ///    department, or the resource owner's department.
    /// 7. Read falls through to any effective grant naming the user.
    /// 8. Deny.
    pub async fn can_access(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        resource_id: Uuid,
        action: AccessAction,
    ) -> AccessResult<AccessDecision> {
        let mut pass = ResolutionPass::new(self.store());
        let decision = self
            .evaluate(&mut pass, user_id, kind, resource_id, action)
            .await?;
        tracing::debug!(
            user_id = %user_id,
            resource = %resource_id,
            kind = kind.as_str(),
            action = action.as_str(),
            allowed = decision.is_allowed(),
            "Access evaluated"
        );
        Ok(decision)
    }

    /// Ladder body, reusable within a batch pass.
    pub(crate) async fn evaluate(
        &self,
        pass: &mut ResolutionPass<'_>,
        user_id: Uuid,
        kind: ResourceKind,
        resource_id: Uuid,
        action: AccessAction,
    ) -> AccessResult<AccessDecision> {
        let user = match self.store().user(user_id).await? {
            Some(user) if user.is_active => user,
            Some(_) => return Ok(AccessDecision::deny("user account is inactive")),
            None => return Ok(AccessDecision::deny("unknown user")),
        };

        // Step 1: superadmin bypasses everything.
        if user.is_superadmin_account() {
            return Ok(AccessDecision::allow());
        }

        let resource = match pass.load(kind, resource_id).await? {
            Some(resource) => resource,
            None => return Ok(AccessDecision::deny("resource not found")),
        };

        // Step 2: organization boundary.
        let org_role = match pass.org_role(user_id, resource.organization_id).await? {
            Some(role) => role,
            None => {
                return Ok(AccessDecision::deny(
                    "no membership in resource organization",
                ))
            }
        };

        // Step 3: organization owner.
        if org_role == OrgRole::Owner {
            if action == AccessAction::Read {
                return Ok(AccessDecision::allow());
            }
            let superadmins = pass.superadmin_ids().await?;
            let owned_by_superadmin = Owned::owner_id(&resource)
                .map(|o| superadmins.contains(&o))
                .unwrap_or(false);
            return Ok(if owned_by_superadmin {
                AccessDecision::deny("content created by a superadmin account")
            } else {
                AccessDecision::allow()
            });
        }

        // Step 4: resource owner.
        if Owned::owner_id(&resource) == Some(user_id) {
            return Ok(AccessDecision::allow());
        }

        // Step 5: mutations require an explicit grant at a sufficient level.
        if action.is_mutating() {
            let grant = pass.effective_grant_for(kind, resource_id, user_id).await?;
            let allowed = match (&grant, action) {
                (Some(g), AccessAction::Write | AccessAction::Delete) => g.access_level.can_write(),
                (Some(g), AccessAction::Share) => g.access_level.can_reshare(),
                _ => false,
            };
            return Ok(if allowed {
                AccessDecision::allow()
            } else {
                AccessDecision::deny(match action {
                    AccessAction::Share => "sharing requires a full-level grant",
                    _ => "mutation requires an edit- or full-level grant",
                })
            });
        }

        // Step 6: department authority (read only).
        if self
            .department_read_allowed(pass, user_id, &resource)
            .await?
        {
            return Ok(AccessDecision::allow());
        }

        // Step 7: any effective grant authorizes read.
        if pass
            .effective_grant_for(kind, resource_id, user_id)
            .await?
            .is_some()
        {
            return Ok(AccessDecision::allow());
        }

        Ok(AccessDecision::deny("no authority source matched"))
    }

    /// True when one of the user's admin departments matches the resource's
    /// department, its linked candidate's department, or the resource
    /// owner's department.
    async fn department_read_allowed(
        &self,
        pass: &mut ResolutionPass<'_>,
        user_id: Uuid,
        resource: &ResourceRecord,
    ) -> AccessResult<bool> {
        let admin_depts = pass.admin_department_ids(user_id).await?;
        if admin_depts.is_empty() {
            return Ok(false);
        }

        if let Some(dept) = DepartmentScoped::department_id(resource) {
            if admin_depts.contains(&dept) {
                return Ok(true);
            }
        }

        if let Some(candidate_id) = LinkedEntity::linked_candidate_id(resource) {
            if let Some(candidate) = pass
                .load(ResourceKind::CandidateRecord, candidate_id)
                .await?
            {
                if let Some(dept) = DepartmentScoped::department_id(&candidate) {
                    if admin_depts.contains(&dept) {
                        return Ok(true);
                    }
                }
            }
        }

        if let Some(owner) = Owned::owner_id(resource) {
            let owner_depts = pass.department_ids(owner).await?;
            if owner_depts.iter().any(|d| admin_depts.contains(d)) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryAccessStore;
    use std::sync::Arc;
    use talent_org::{
        AccessLevel, DepartmentMembership, OrgMembership, SharedAccessGrant, User,
    };
    use talent_rbac::{DeptRole, GlobalRole};

    struct Fixture {
        engine: AccessEngine,
        store: Arc<MemoryAccessStore>,
        org_id: Uuid,
    }

    impl Fixture {
        async fn new() -> Self {
            let store = Arc::new(MemoryAccessStore::new());
            Self {
                engine: AccessEngine::new(store.clone()),
                store,
                org_id: Uuid::now_v7(),
            }
        }

        async fn member(&self) -> User {
            let user = User::new(GlobalRole::Member);
            self.store.add_user(user.clone()).await;
            self.store
                .add_org_membership(OrgMembership::new(
                    self.org_id,
                    user.id,
                    talent_rbac::OrgRole::Member,
                ))
                .await;
            user
        }

        async fn candidate(&self, owner: Uuid, dept: Option<Uuid>) -> ResourceRecord {
            let record = ResourceRecord {
                id: Uuid::now_v7(),
                kind: ResourceKind::CandidateRecord,
                organization_id: self.org_id,
                department_id: dept,
                owner_id: Some(owner),
                linked_candidate_id: None,
            };
            self.store.add_resource(record.clone()).await;
            record
        }

        async fn check(&self, user: Uuid, resource: &ResourceRecord, action: AccessAction) -> bool {
            self.engine
                .can_access(user, resource.kind, resource.id, action)
                .await
                .unwrap()
                .is_allowed()
        }
    }

    const ALL_ACTIONS: [AccessAction; 4] = [
        AccessAction::Read,
        AccessAction::Write,
        AccessAction::Delete,
        AccessAction::Share,
    ];

    #[tokio::test]
    async fn test_superadmin_allowed_everything() {
        let fx = Fixture::new().await;
        let superadmin = User::new(GlobalRole::Superadmin);
        fx.store.add_user(superadmin.clone()).await;
        let owner = fx.member().await;
        let resource = fx.candidate(owner.id, None).await;

        for action in ALL_ACTIONS {
            assert!(fx.check(superadmin.id, &resource, action).await);
        }
    }

    #[tokio::test]
    async fn test_org_boundary_denies() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let resource = fx.candidate(owner.id, None).await;

        let outsider = User::new(GlobalRole::Member);
        fx.store.add_user(outsider.clone()).await;

        let decision = fx
            .engine
            .can_access(outsider.id, resource.kind, resource.id, AccessAction::Read)
            .await
            .unwrap();
        assert!(!decision.is_allowed());
        assert_eq!(
            decision.reason(),
            Some("no membership in resource organization")
        );
    }

    #[tokio::test]
    async fn test_org_owner_shadow_content_isolation() {
        let fx = Fixture::new().await;
        let org_owner = User::new(GlobalRole::Member);
        fx.store.add_user(org_owner.clone()).await;
        fx.store
            .add_org_membership(OrgMembership::new(
                fx.org_id,
                org_owner.id,
                talent_rbac::OrgRole::Owner,
            ))
            .await;

        let superadmin = User::new(GlobalRole::Superadmin);
        fx.store.add_user(superadmin.clone()).await;
        let hidden = fx.candidate(superadmin.id, None).await;

        // Read is allowed, every mutation is not.
        assert!(fx.check(org_owner.id, &hidden, AccessAction::Read).await);
        assert!(!fx.check(org_owner.id, &hidden, AccessAction::Write).await);
        assert!(!fx.check(org_owner.id, &hidden, AccessAction::Delete).await);
        assert!(!fx.check(org_owner.id, &hidden, AccessAction::Share).await);

        // Ordinary member content is fully accessible to the org owner.
        let member = fx.member().await;
        let normal = fx.candidate(member.id, None).await;
        for action in ALL_ACTIONS {
            assert!(fx.check(org_owner.id, &normal, action).await);
        }
    }

    #[tokio::test]
    async fn test_resource_owner_allowed_everything() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let resource = fx.candidate(owner.id, None).await;

        for action in ALL_ACTIONS {
            assert!(fx.check(owner.id, &resource, action).await);
        }
    }

    #[tokio::test]
    async fn test_view_grant_reads_but_never_writes() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let grantee = fx.member().await;
        let resource = fx.candidate(owner.id, None).await;

        fx.store
            .add_grant(SharedAccessGrant::new(
                resource.kind,
                resource.id,
                owner.id,
                grantee.id,
                AccessLevel::View,
            ))
            .await;

        assert!(fx.check(grantee.id, &resource, AccessAction::Read).await);
        assert!(!fx.check(grantee.id, &resource, AccessAction::Write).await);
        assert!(!fx.check(grantee.id, &resource, AccessAction::Delete).await);
        assert!(!fx.check(grantee.id, &resource, AccessAction::Share).await);
    }

    #[tokio::test]
    async fn test_edit_grant_writes_but_cannot_share() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let grantee = fx.member().await;
        let resource = fx.candidate(owner.id, None).await;

        fx.store
            .add_grant(SharedAccessGrant::new(
                resource.kind,
                resource.id,
                owner.id,
                grantee.id,
                AccessLevel::Edit,
            ))
            .await;

        assert!(fx.check(grantee.id, &resource, AccessAction::Write).await);
        assert!(fx.check(grantee.id, &resource, AccessAction::Delete).await);
        assert!(!fx.check(grantee.id, &resource, AccessAction::Share).await);
    }

    #[tokio::test]
    async fn test_full_grant_can_share() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let grantee = fx.member().await;
        let resource = fx.candidate(owner.id, None).await;

        fx.store
            .add_grant(SharedAccessGrant::new(
                resource.kind,
                resource.id,
                owner.id,
                grantee.id,
                AccessLevel::Full,
            ))
            .await;

        assert!(fx.check(grantee.id, &resource, AccessAction::Share).await);
    }

    #[tokio::test]
    async fn test_expired_grant_behaves_as_absent() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let grantee = fx.member().await;
        let resource = fx.candidate(owner.id, None).await;

        fx.store
            .add_grant(
                SharedAccessGrant::new(
                    resource.kind,
                    resource.id,
                    owner.id,
                    grantee.id,
                    AccessLevel::Full,
                )
                .with_expiry(chrono::Utc::now() - chrono::Duration::minutes(5)),
            )
            .await;

        for action in ALL_ACTIONS {
            assert!(!fx.check(grantee.id, &resource, action).await);
        }
    }

    #[tokio::test]
    async fn test_dept_admin_reads_department_resources() {
        let fx = Fixture::new().await;
        let dept = Uuid::now_v7();
        let owner = fx.member().await;
        let lead = fx.member().await;
        fx.store
            .add_dept_membership(DepartmentMembership::new(dept, lead.id, DeptRole::Lead))
            .await;

        let resource = fx.candidate(owner.id, Some(dept)).await;
        assert!(fx.check(lead.id, &resource, AccessAction::Read).await);
        // Department authority never authorizes mutation.
        assert!(!fx.check(lead.id, &resource, AccessAction::Write).await);
        assert!(!fx.check(lead.id, &resource, AccessAction::Delete).await);
        assert!(!fx.check(lead.id, &resource, AccessAction::Share).await);
    }

    #[tokio::test]
    async fn test_dept_member_without_admin_role_cannot_read() {
        let fx = Fixture::new().await;
        let dept = Uuid::now_v7();
        let owner = fx.member().await;
        let peer = fx.member().await;
        fx.store
            .add_dept_membership(DepartmentMembership::new(dept, peer.id, DeptRole::Member))
            .await;

        let resource = fx.candidate(owner.id, Some(dept)).await;
        assert!(!fx.check(peer.id, &resource, AccessAction::Read).await);
    }

    #[tokio::test]
    async fn test_dept_admin_reads_through_linked_candidate() {
        let fx = Fixture::new().await;
        let dept = Uuid::now_v7();
        let owner = fx.member().await;
        let lead = fx.member().await;
        fx.store
            .add_dept_membership(DepartmentMembership::new(dept, lead.id, DeptRole::Lead))
            .await;

        let candidate = fx.candidate(owner.id, Some(dept)).await;
        let thread = ResourceRecord {
            id: Uuid::now_v7(),
            kind: ResourceKind::ConversationThread,
            organization_id: fx.org_id,
            department_id: None,
            owner_id: Some(owner.id),
            linked_candidate_id: Some(candidate.id),
        };
        fx.store.add_resource(thread.clone()).await;

        assert!(fx.check(lead.id, &thread, AccessAction::Read).await);
    }

    #[tokio::test]
    async fn test_dept_admin_reads_department_members_content() {
        let fx = Fixture::new().await;
        let dept = Uuid::now_v7();
        let owner = fx.member().await;
        let lead = fx.member().await;
        fx.store
            .add_dept_membership(DepartmentMembership::new(dept, lead.id, DeptRole::Lead))
            .await;
        fx.store
            .add_dept_membership(DepartmentMembership::new(dept, owner.id, DeptRole::Member))
            .await;

        // No department on the resource itself; authority flows through the
        // owner's membership in the lead's department.
        let resource = fx.candidate(owner.id, None).await;
        assert!(fx.check(lead.id, &resource, AccessAction::Read).await);
    }

    #[tokio::test]
    async fn test_missing_resource_denied() {
        let fx = Fixture::new().await;
        let user = fx.member().await;
        let decision = fx
            .engine
            .can_access(
                user.id,
                ResourceKind::CandidateRecord,
                Uuid::now_v7(),
                AccessAction::Read,
            )
            .await
            .unwrap();
        assert!(!decision.is_allowed());
        assert_eq!(decision.reason(), Some("resource not found"));
    }

    #[tokio::test]
    async fn test_inactive_user_denied() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let resource = fx.candidate(owner.id, None).await;

        let mut suspended = User::new(GlobalRole::Member);
        suspended.is_active = false;
        fx.store.add_user(suspended.clone()).await;
        fx.store
            .add_org_membership(OrgMembership::new(
                fx.org_id,
                suspended.id,
                talent_rbac::OrgRole::Member,
            ))
            .await;

        assert!(!fx.check(suspended.id, &resource, AccessAction::Read).await);
    }
}
