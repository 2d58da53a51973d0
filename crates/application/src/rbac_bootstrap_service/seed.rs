use tasklane_core::AppResult;
use tasklane_domain::{PermissionId, PermissionKey, RoleName};

use super::{BootstrapReport, RbacBootstrapService, StarterRole};

impl RbacBootstrapService {
    pub(super) async fn seed_role(
        &self,
        starter: &StarterRole,
        report: &mut BootstrapReport,
    ) -> AppResult<()> {
        let name = RoleName::new(starter.name)?;
        let (role, created) = self
            .role_repository
            .get_or_create_role(&name, Some(starter.description))
            .await?;

        if created {
            report.roles_created.push(name.as_str().to_owned());
        }

        if !created && !role.permissions().is_empty() {
            return Ok(());
        }

        let permission_ids = self.resolve_starter_permissions(starter, report).await;
        self.role_repository
            .set_role_permissions(role.role_id(), &permission_ids)
            .await?;

        if !permission_ids.is_empty() {
            report.roles_populated.push(name.as_str().to_owned());
        }

        Ok(())
    }

    async fn resolve_starter_permissions(
        &self,
        starter: &StarterRole,
        report: &mut BootstrapReport,
    ) -> Vec<PermissionId> {
        let mut permission_ids = Vec::with_capacity(starter.permissions.len());

        for (resource_type, codename) in starter.permissions {
            let resolved = match PermissionKey::new(*resource_type, *codename) {
                Ok(key) => self.permission_catalog.find_permission(&key).await,
                Err(error) => Err(error),
            };

            match resolved {
                Ok(Some(permission)) => permission_ids.push(permission.permission_id()),
                Ok(None) => {
                    tracing::warn!(
                        role_name = starter.name,
                        resource_type,
                        codename,
                        "starter permission missing from catalog"
                    );
                    report
                        .unresolved_permissions
                        .push(format!("{resource_type}.{codename}"));
                }
                Err(error) => {
                    tracing::warn!(
                        role_name = starter.name,
                        resource_type,
                        codename,
                        %error,
                        "starter permission lookup failed"
                    );
                    report
                        .unresolved_permissions
                        .push(format!("{resource_type}.{codename}"));
                }
            }
        }

        permission_ids
    }
}
