use tasklane_core::AppResult;
use tasklane_domain::{ADMIN_ROLE_NAME, CatalogPermission, PermissionId};

use crate::RoleLookup;

use super::{BOOTSTRAP_GROUP_NAME, BootstrapReport, RbacBootstrapService};

impl RbacBootstrapService {
    /// Creates the administrators group on first run with the full catalog
    /// and a link to the `admin` role. Later runs leave it untouched.
    pub(super) async fn ensure_bootstrap_group(
        &self,
        report: &mut BootstrapReport,
    ) -> AppResult<()> {
        let (group, created) = self
            .group_repository
            .get_or_create_group(BOOTSTRAP_GROUP_NAME)
            .await?;
        if !created {
            return Ok(());
        }
        report.group_created = true;

        let permission_ids: Vec<PermissionId> = self
            .permission_catalog
            .list_permissions()
            .await?
            .iter()
            .map(CatalogPermission::permission_id)
            .collect();
        self.group_repository
            .set_group_permissions(group.group_id, &permission_ids)
            .await?;

        match self
            .role_repository
            .find_role(&RoleLookup::Name(ADMIN_ROLE_NAME.to_owned()))
            .await
        {
            Ok(Some(role)) => {
                self.group_repository
                    .link_group_role(group.group_id, role.role_id())
                    .await?;
            }
            Ok(None) => {
                tracing::warn!(
                    group_name = BOOTSTRAP_GROUP_NAME,
                    "admin role missing; group left unlinked"
                );
            }
            Err(error) => {
                tracing::warn!(
                    group_name = BOOTSTRAP_GROUP_NAME,
                    %error,
                    "admin role lookup failed; group left unlinked"
                );
            }
        }

        Ok(())
    }
}
