//! Feature gate resolution
//!
//! Default features are always on; restricted features are opt-in through
//! [`FeatureSetting`](talent_org::FeatureSetting) rows. Department rows are
//! more specific than the org-wide row, and their mere presence suppresses
//! the org-wide fallback even when every one of them is disabled.

use uuid::Uuid;

use talent_org::is_default_feature;
use talent_rbac::OrgRole;

use crate::engine::AccessEngine;
use crate::error::AccessResult;
use crate::pass::ResolutionPass;
use crate::store::{FeatureStore, UserDirectory};

impl AccessEngine {
    /// Decide whether `user_id` may use `feature` within `org_id`.
    ///
    /// When `department` is supplied only that department's row is consulted;
    /// otherwise every department the user belongs to is. Precedence:
    /// 1. Superadmin accounts and organization owners: always allowed.
    /// 2. Default features: always allowed.
    /// 3. Department-scoped rows: any enabled row allows; rows present but
    ///    all disabled denies, without falling back to the org-wide row.
    /// 4. The org-wide row's enabled flag.
    /// 5. No row anywhere: denied.
    pub async fn can_access_feature(
        &self,
        user_id: Uuid,
        org_id: Uuid,
        feature: &str,
        department: Option<Uuid>,
    ) -> AccessResult<bool> {
        let user = match self.store().user(user_id).await? {
            Some(user) if user.is_active => user,
            _ => return Ok(false),
        };

        if user.is_superadmin_account() {
            return Ok(true);
        }

        let mut pass = ResolutionPass::new(self.store());
        if pass.org_role(user_id, org_id).await? == Some(OrgRole::Owner) {
            return Ok(true);
        }

        if is_default_feature(feature) {
            return Ok(true);
        }

        let departments: Vec<Uuid> = match department {
            Some(dept) => vec![dept],
            None => pass.department_ids(user_id).await?.into_iter().collect(),
        };

        if !departments.is_empty() {
            let rows = self
                .store()
                .department_settings(org_id, feature, &departments)
                .await?;
            if !rows.is_empty() {
                let enabled = rows.iter().any(|row| row.enabled);
                tracing::debug!(
                    user_id = %user_id,
                    org_id = %org_id,
                    feature,
                    enabled,
                    "Feature decided by department rows"
                );
                return Ok(enabled);
            }
        }

        match self.store().org_setting(org_id, feature).await? {
            Some(row) => Ok(row.enabled),
            None => Ok(false),
        }
    }
}
