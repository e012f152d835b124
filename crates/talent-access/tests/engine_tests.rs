//! End-to-end tests for the access resolution engine.
//!
//! These tests exercise the full engine against a seeded in-memory store:
//! per-resource decisions, batch visibility, effective permissions, feature
//! gating, sharing eligibility, and the audited management operations —
//! including the cross-cutting guarantees (batch/per-item agreement,
//! shadow-content isolation, expiry, override revert).

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use talent_access::store::AuditSink;
use talent_access::{AccessAction, AccessEngine, MemoryAccessStore, PermissionSource};
use talent_org::{
    AccessLevel, DepartmentMembership, OrgMembership, ResourceKind, ResourceRecord,
    SharedAccessGrant, User,
};
use talent_rbac::{CapabilityRole, DeptRole, GlobalRole, OrgRole, PermissionKey};

const ALL_ACTIONS: [AccessAction; 4] = [
    AccessAction::Read,
    AccessAction::Write,
    AccessAction::Delete,
    AccessAction::Share,
];

/// A populated tenant: one org, two departments, the usual cast.
struct TestFixture {
    engine: AccessEngine,
    store: Arc<MemoryAccessStore>,
    org_id: Uuid,
    dept_sales: Uuid,
    dept_eng: Uuid,
    superadmin: User,
    org_owner: User,
    sales_lead: User,
    sales_member: User,
    eng_member: User,
}

impl TestFixture {
    async fn new() -> Self {
        let store = Arc::new(MemoryAccessStore::new());
        let engine = AccessEngine::new(store.clone());
        let org_id = Uuid::now_v7();
        let dept_sales = Uuid::now_v7();
        let dept_eng = Uuid::now_v7();

        let superadmin = User::new(GlobalRole::Superadmin);
        store.add_user(superadmin.clone()).await;

        let org_owner = User::new(GlobalRole::Member);
        store.add_user(org_owner.clone()).await;
        store
            .add_org_membership(OrgMembership::new(org_id, org_owner.id, OrgRole::Owner))
            .await;

        let sales_lead = User::new(GlobalRole::Member);
        store.add_user(sales_lead.clone()).await;
        store
            .add_org_membership(OrgMembership::new(org_id, sales_lead.id, OrgRole::Member))
            .await;
        store
            .add_dept_membership(DepartmentMembership::new(
                dept_sales,
                sales_lead.id,
                DeptRole::Lead,
            ))
            .await;

        let sales_member = User::new(GlobalRole::Member);
        store.add_user(sales_member.clone()).await;
        store
            .add_org_membership(OrgMembership::new(org_id, sales_member.id, OrgRole::Member))
            .await;
        store
            .add_dept_membership(DepartmentMembership::new(
                dept_sales,
                sales_member.id,
                DeptRole::Member,
            ))
            .await;

        let eng_member = User::new(GlobalRole::Member);
        store.add_user(eng_member.clone()).await;
        store
            .add_org_membership(OrgMembership::new(org_id, eng_member.id, OrgRole::Member))
            .await;
        store
            .add_dept_membership(DepartmentMembership::new(
                dept_eng,
                eng_member.id,
                DeptRole::Member,
            ))
            .await;

        Self {
            engine,
            store,
            org_id,
            dept_sales,
            dept_eng,
            superadmin,
            org_owner,
            sales_lead,
            sales_member,
            eng_member,
        }
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

    async fn allowed(&self, user: Uuid, resource: &ResourceRecord, action: AccessAction) -> bool {
        self.engine
            .can_access(user, resource.kind, resource.id, action)
            .await
            .unwrap()
            .is_allowed()
    }
}

#[tokio::test]
async fn test_superadmin_allowed_on_every_resource_and_action() {
    let fx = TestFixture::new().await;
    let resources = [
        fx.candidate(fx.sales_member.id, Some(fx.dept_sales)).await,
        fx.candidate(fx.eng_member.id, None).await,
        fx.candidate(fx.org_owner.id, Some(fx.dept_eng)).await,
    ];

    for resource in &resources {
        for action in ALL_ACTIONS {
            assert!(fx.allowed(fx.superadmin.id, resource, action).await);
        }
    }
}

#[tokio::test]
async fn test_owner_reads_but_cannot_touch_superadmin_content() {
    let fx = TestFixture::new().await;
    let hidden = fx.candidate(fx.superadmin.id, None).await;

    assert!(fx.allowed(fx.org_owner.id, &hidden, AccessAction::Read).await);
    assert!(!fx.allowed(fx.org_owner.id, &hidden, AccessAction::Write).await);
    assert!(!fx.allowed(fx.org_owner.id, &hidden, AccessAction::Delete).await);
    assert!(!fx.allowed(fx.org_owner.id, &hidden, AccessAction::Share).await);
}

#[tokio::test]
async fn test_batch_agrees_with_per_item_reads() {
    let fx = TestFixture::new().await;

    // A spread of resources across departments, owners, and grants.
    let mut all = Vec::new();
    all.push(fx.candidate(fx.sales_member.id, Some(fx.dept_sales)).await);
    all.push(fx.candidate(fx.eng_member.id, Some(fx.dept_eng)).await);
    all.push(fx.candidate(fx.org_owner.id, None).await);
    all.push(fx.candidate(fx.superadmin.id, None).await);
    let shared = fx.candidate(fx.eng_member.id, None).await;
    fx.store
        .add_grant(SharedAccessGrant::new(
            shared.kind,
            shared.id,
            fx.eng_member.id,
            fx.sales_member.id,
            AccessLevel::View,
        ))
        .await;
    all.push(shared);

    // Threads linked to a sales candidate are visible to the sales lead.
    let linked = ResourceRecord {
        id: Uuid::now_v7(),
        kind: ResourceKind::ConversationThread,
        organization_id: fx.org_id,
        department_id: None,
        owner_id: Some(fx.eng_member.id),
        linked_candidate_id: Some(all[0].id),
    };
    fx.store.add_resource(linked.clone()).await;

    for user in [fx.sales_lead.id, fx.sales_member.id, fx.eng_member.id] {
        for kind in [ResourceKind::CandidateRecord, ResourceKind::ConversationThread] {
            let batch = fx.engine.accessible_ids(user, kind, fx.org_id).await.unwrap();
            let mut per_item = HashSet::new();
            for resource in all.iter().chain([&linked]).filter(|r| r.kind == kind) {
                if fx.allowed(user, resource, AccessAction::Read).await {
                    per_item.insert(resource.id);
                }
            }
            assert_eq!(batch, per_item, "user {user} kind {}", kind.as_str());
        }
    }
}

#[tokio::test]
async fn test_owner_batch_hides_superadmin_content() {
    let fx = TestFixture::new().await;
    let visible = fx.candidate(fx.sales_member.id, None).await;
    let hidden = fx.candidate(fx.superadmin.id, None).await;

    let ids = fx
        .engine
        .accessible_ids(fx.org_owner.id, ResourceKind::CandidateRecord, fx.org_id)
        .await
        .unwrap();
    assert!(ids.contains(&visible.id));
    assert!(!ids.contains(&hidden.id));
}

#[tokio::test]
async fn test_disabled_dept_feature_row_beats_enabled_org_row() {
    let fx = TestFixture::new().await;

    fx.engine
        .set_feature_flag(fx.org_owner.id, fx.org_id, None, "ai_summaries", true)
        .await
        .unwrap();
    fx.engine
        .set_feature_flag(
            fx.org_owner.id,
            fx.org_id,
            Some(fx.dept_sales),
            "ai_summaries",
            false,
        )
        .await
        .unwrap();
    // Another department's enabled row must not leak to sales members.
    fx.engine
        .set_feature_flag(
            fx.org_owner.id,
            fx.org_id,
            Some(fx.dept_eng),
            "ai_summaries",
            true,
        )
        .await
        .unwrap();

    assert!(!fx
        .engine
        .can_access_feature(fx.sales_member.id, fx.org_id, "ai_summaries", None)
        .await
        .unwrap());
    assert!(fx
        .engine
        .can_access_feature(fx.eng_member.id, fx.org_id, "ai_summaries", None)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_override_grants_and_reverts_cleanly() {
    let fx = TestFixture::new().await;

    let role = fx
        .engine
        .create_custom_role(
            fx.superadmin.id,
            "Sharing Member",
            CapabilityRole::Member,
            Some(fx.org_id),
        )
        .await
        .unwrap();
    fx.engine
        .set_permission_override(fx.superadmin.id, role.id, "can_share_resources", true)
        .await
        .unwrap();
    fx.engine
        .assign_custom_role(fx.superadmin.id, role.id, fx.sales_member.id)
        .await
        .unwrap();

    let resolved = fx
        .engine
        .effective_permissions(fx.sales_member.id)
        .await
        .unwrap();
    assert_eq!(resolved.source, PermissionSource::CustomRole);
    assert!(resolved.capabilities.allows(PermissionKey::ShareResources));

    fx.engine
        .remove_permission_override(fx.superadmin.id, role.id, "can_share_resources")
        .await
        .unwrap();
    let resolved = fx
        .engine
        .effective_permissions(fx.sales_member.id)
        .await
        .unwrap();
    // Back to the member default for that key, nothing else disturbed.
    assert!(!resolved.capabilities.allows(PermissionKey::ShareResources));
    assert!(resolved.capabilities.allows(PermissionKey::ViewCandidates));
}

#[tokio::test]
async fn test_expired_grant_is_inert_everywhere() {
    let fx = TestFixture::new().await;
    let resource = fx.candidate(fx.eng_member.id, None).await;

    fx.store
        .add_grant(
            SharedAccessGrant::new(
                resource.kind,
                resource.id,
                fx.eng_member.id,
                fx.sales_member.id,
                AccessLevel::Full,
            )
            .with_expiry(chrono::Utc::now() - chrono::Duration::days(1)),
        )
        .await;

    for action in ALL_ACTIONS {
        assert!(!fx.allowed(fx.sales_member.id, &resource, action).await);
    }
    let ids = fx
        .engine
        .accessible_ids(fx.sales_member.id, ResourceKind::CandidateRecord, fx.org_id)
        .await
        .unwrap();
    assert!(!ids.contains(&resource.id));
}

#[tokio::test]
async fn test_lead_cannot_name_other_department_member() {
    let fx = TestFixture::new().await;
    let decision = fx
        .engine
        .can_share_to(fx.sales_lead.id, fx.eng_member.id, fx.org_id)
        .await
        .unwrap();
    assert!(!decision.is_allowed());

    // Within the lead's own department sharing is fine.
    let decision = fx
        .engine
        .can_share_to(fx.sales_lead.id, fx.sales_member.id, fx.org_id)
        .await
        .unwrap();
    assert!(decision.is_allowed());
}

#[tokio::test]
async fn test_view_share_flow_end_to_end() {
    let fx = TestFixture::new().await;
    let resource = fx.candidate(fx.sales_member.id, None).await;

    fx.engine
        .share_resource(
            fx.sales_member.id,
            resource.kind,
            resource.id,
            fx.sales_lead.id,
            AccessLevel::View,
            None,
        )
        .await
        .unwrap();

    assert!(fx.allowed(fx.sales_lead.id, &resource, AccessAction::Read).await);
    assert!(!fx.allowed(fx.sales_lead.id, &resource, AccessAction::Write).await);
}

#[tokio::test]
async fn test_management_trail_is_fully_audited() {
    let fx = TestFixture::new().await;

    let role = fx
        .engine
        .create_custom_role(fx.superadmin.id, "Auditor", CapabilityRole::Member, None)
        .await
        .unwrap();
    fx.engine
        .set_permission_override(fx.superadmin.id, role.id, "can_view_audit_log", true)
        .await
        .unwrap();
    fx.engine
        .assign_custom_role(fx.superadmin.id, role.id, fx.sales_member.id)
        .await
        .unwrap();
    fx.engine
        .unassign_custom_role(fx.superadmin.id, fx.sales_member.id)
        .await
        .unwrap();
    fx.engine
        .deactivate_custom_role(fx.superadmin.id, role.id)
        .await
        .unwrap();

    let entries = fx.store.audit_entries().await.unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(
        actions,
        vec![
            "custom_role_created",
            "override_set",
            "role_assigned",
            "role_unassigned",
            "custom_role_deactivated",
        ]
    );
    for entry in &entries {
        assert_eq!(entry.actor_id, fx.superadmin.id);
    }
}
