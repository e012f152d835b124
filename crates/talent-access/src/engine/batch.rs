//! Batch visibility resolution
//!
//! Produces the full set of resource IDs a user can read in one pass, in set
//! algebra over the store's indexed queries rather than by probing resources
//! one at a time. For any user who is not an organization owner the result is
//! exactly the set of IDs the per-resource evaluator would allow for read.

use std::collections::HashSet;
use uuid::Uuid;

use talent_org::ResourceKind;
use talent_rbac::OrgRole;

use crate::engine::AccessEngine;
use crate::error::AccessResult;
use crate::pass::ResolutionPass;
use crate::store::{ResourceStore, UserDirectory};

impl AccessEngine {
    /// Resolve every resource ID of `kind` in `org_id` that `user_id` can
    /// read.
    ///
    /// The result is built from the user's authority sources:
    /// - superadmin accounts see every ID in the organization;
    /// - organization owners see every ID except content owned by a
    ///   superadmin account (the one place the listing is narrower than a
    ///   direct read, which owners are still allowed);
    /// - everyone else sees what they own, what falls under their admin
    ///   departments (directly or through a linked candidate record), what
    ///   members of those departments own, and what has been shared with
    ///   them;
    /// - users with no membership in `org_id` see nothing.
    pub async fn accessible_ids(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        org_id: Uuid,
    ) -> AccessResult<HashSet<Uuid>> {
        let user = match self.store().user(user_id).await? {
            Some(user) if user.is_active => user,
            _ => return Ok(HashSet::new()),
        };

        let mut pass = ResolutionPass::new(self.store());

        if user.is_superadmin_account() {
            return self.store().ids_in_org(kind, org_id).await;
        }

        let org_role = match pass.org_role(user_id, org_id).await? {
            Some(role) => role,
            None => return Ok(HashSet::new()),
        };

        if org_role == OrgRole::Owner {
            let mut ids = self.store().ids_in_org(kind, org_id).await?;
            let superadmins = pass.superadmin_ids().await?;
            if !superadmins.is_empty() {
                let owners: Vec<Uuid> = superadmins.into_iter().collect();
                let hidden = self.store().ids_owned_by(kind, org_id, &owners).await?;
                ids.retain(|id| !hidden.contains(id));
            }
            tracing::debug!(
                user_id = %user_id,
                org_id = %org_id,
                kind = kind.as_str(),
                count = ids.len(),
                "Resolved owner visibility set"
            );
            return Ok(ids);
        }

        let mut ids = self.store().ids_owned_by(kind, org_id, &[user_id]).await?;

        let admin_depts: Vec<Uuid> = pass.admin_department_ids(user_id).await?.into_iter().collect();
        if !admin_depts.is_empty() {
            ids.extend(
                self.store()
                    .ids_in_departments(kind, org_id, &admin_depts)
                    .await?,
            );

            let mut colleagues: HashSet<Uuid> = HashSet::new();
            for dept in &admin_depts {
                colleagues.extend(pass.department_member_ids(*dept).await?);
            }
            colleagues.remove(&user_id);
            if !colleagues.is_empty() {
                let owners: Vec<Uuid> = colleagues.into_iter().collect();
                ids.extend(self.store().ids_owned_by(kind, org_id, &owners).await?);
            }
        }

        for grant in pass.effective_grants_for_user(user_id).await? {
            if grant.resource_kind != kind || ids.contains(&grant.resource_id) {
                continue;
            }
            // Grants carry no org column; confirm the resource lives here.
            if let Some(resource) = pass.load(kind, grant.resource_id).await? {
                if resource.organization_id == org_id {
                    ids.insert(grant.resource_id);
                }
            }
        }

        tracing::debug!(
            user_id = %user_id,
            org_id = %org_id,
            kind = kind.as_str(),
            count = ids.len(),
            "Resolved visibility set"
        );
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AccessAction;
    use crate::memory::MemoryAccessStore;
    use std::sync::Arc;
    use talent_org::{
        AccessLevel, DepartmentMembership, OrgMembership, ResourceRecord, SharedAccessGrant, User,
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
    }

    #[tokio::test]
    async fn test_superadmin_sees_everything() {
        let fx = Fixture::new().await;
        let superadmin = User::new(GlobalRole::Superadmin);
        fx.store.add_user(superadmin.clone()).await;
        let owner = fx.member().await;
        let a = fx.candidate(owner.id, None).await;
        let b = fx.candidate(owner.id, None).await;

        let ids = fx
            .engine
            .accessible_ids(superadmin.id, ResourceKind::CandidateRecord, fx.org_id)
            .await
            .unwrap();
        assert_eq!(ids, HashSet::from([a.id, b.id]));
    }

    #[tokio::test]
    async fn test_org_owner_listing_excludes_superadmin_content() {
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
        let member = fx.member().await;

        let visible = fx.candidate(member.id, None).await;
        let hidden = fx.candidate(superadmin.id, None).await;

        let ids = fx
            .engine
            .accessible_ids(org_owner.id, ResourceKind::CandidateRecord, fx.org_id)
            .await
            .unwrap();
        assert!(ids.contains(&visible.id));
        assert!(!ids.contains(&hidden.id));

        // The direct read on the hidden record is still allowed.
        let decision = fx
            .engine
            .can_access(
                org_owner.id,
                ResourceKind::CandidateRecord,
                hidden.id,
                AccessAction::Read,
            )
            .await
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[tokio::test]
    async fn test_non_member_sees_nothing() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        fx.candidate(owner.id, None).await;

        let outsider = User::new(GlobalRole::Member);
        fx.store.add_user(outsider.clone()).await;

        let ids = fx
            .engine
            .accessible_ids(outsider.id, ResourceKind::CandidateRecord, fx.org_id)
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_member_sees_own_and_granted() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let member = fx.member().await;

        let own = fx.candidate(member.id, None).await;
        let shared = fx.candidate(owner.id, None).await;
        let unrelated = fx.candidate(owner.id, None).await;

        fx.store
            .add_grant(SharedAccessGrant::new(
                shared.kind,
                shared.id,
                owner.id,
                member.id,
                AccessLevel::View,
            ))
            .await;

        let ids = fx
            .engine
            .accessible_ids(member.id, ResourceKind::CandidateRecord, fx.org_id)
            .await
            .unwrap();
        assert_eq!(ids, HashSet::from([own.id, shared.id]));
        assert!(!ids.contains(&unrelated.id));
    }

    #[tokio::test]
    async fn test_expired_grant_absent_from_listing() {
        let fx = Fixture::new().await;
        let owner = fx.member().await;
        let member = fx.member().await;
        let shared = fx.candidate(owner.id, None).await;

        fx.store
            .add_grant(
                SharedAccessGrant::new(
                    shared.kind,
                    shared.id,
                    owner.id,
                    member.id,
                    AccessLevel::View,
                )
                .with_expiry(chrono::Utc::now() - chrono::Duration::hours(1)),
            )
            .await;

        let ids = fx
            .engine
            .accessible_ids(member.id, ResourceKind::CandidateRecord, fx.org_id)
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_dept_lead_sees_department_and_members_content() {
        let fx = Fixture::new().await;
        let dept = Uuid::now_v7();
        let other_dept = Uuid::now_v7();

        let lead = fx.member().await;
        let colleague = fx.member().await;
        let stranger = fx.member().await;
        fx.store
            .add_dept_membership(DepartmentMembership::new(dept, lead.id, DeptRole::Lead))
            .await;
        fx.store
            .add_dept_membership(DepartmentMembership::new(dept, colleague.id, DeptRole::Member))
            .await;

        let in_dept = fx.candidate(stranger.id, Some(dept)).await;
        let colleague_owned = fx.candidate(colleague.id, None).await;
        let elsewhere = fx.candidate(stranger.id, Some(other_dept)).await;

        let ids = fx
            .engine
            .accessible_ids(lead.id, ResourceKind::CandidateRecord, fx.org_id)
            .await
            .unwrap();
        assert!(ids.contains(&in_dept.id));
        assert!(ids.contains(&colleague_owned.id));
        assert!(!ids.contains(&elsewhere.id));
    }

    #[tokio::test]
    async fn test_batch_matches_per_item_for_members() {
        let fx = Fixture::new().await;
        let dept = Uuid::now_v7();
        let lead = fx.member().await;
        let owner = fx.member().await;
        fx.store
            .add_dept_membership(DepartmentMembership::new(dept, lead.id, DeptRole::Lead))
            .await;

        let mut all = Vec::new();
        all.push(fx.candidate(lead.id, None).await);
        all.push(fx.candidate(owner.id, Some(dept)).await);
        all.push(fx.candidate(owner.id, None).await);
        let shared = fx.candidate(owner.id, None).await;
        fx.store
            .add_grant(SharedAccessGrant::new(
                shared.kind,
                shared.id,
                owner.id,
                lead.id,
                AccessLevel::Edit,
            ))
            .await;
        all.push(shared);

        let batch = fx
            .engine
            .accessible_ids(lead.id, ResourceKind::CandidateRecord, fx.org_id)
            .await
            .unwrap();

        for resource in &all {
            let direct = fx
                .engine
                .can_access(lead.id, resource.kind, resource.id, AccessAction::Read)
                .await
                .unwrap()
                .is_allowed();
            assert_eq!(batch.contains(&resource.id), direct, "id {}", resource.id);
        }
    }
}
