use tasklane_application::{AssignOutcome, PermissionPage};
use tasklane_core::{AppError, AppResult};
use tasklane_domain::{CatalogPermission, PermissionId, Role, RoleAssignment};
use uuid::Uuid;

use super::{
    AssignRoleResponse, PermissionPageResponse, PermissionResponse, RoleAssignmentResponse,
    RoleResponse, RoleSummaryResponse,
};

/// Parses transport permission identifiers.
pub fn parse_permission_ids(values: &[String]) -> AppResult<Vec<PermissionId>> {
    values
        .iter()
        .map(|value| {
            Uuid::parse_str(value.trim())
                .map(PermissionId::from_uuid)
                .map_err(|error| {
                    AppError::Validation(format!("invalid permission id '{value}': {error}"))
                })
        })
        .collect()
}

impl From<&CatalogPermission> for PermissionResponse {
    fn from(value: &CatalogPermission) -> Self {
        Self {
            permission_id: value.permission_id().to_string(),
            resource_type: value.key().resource_type().to_owned(),
            codename: value.codename().to_owned(),
            name: value.name().to_owned(),
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.role_id().to_string(),
            name: value.name().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            permissions: value
                .permissions()
                .iter()
                .map(PermissionResponse::from)
                .collect(),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

impl From<Role> for RoleSummaryResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.role_id().to_string(),
            name: value.name().as_str().to_owned(),
        }
    }
}

impl From<PermissionPage> for PermissionPageResponse {
    fn from(value: PermissionPage) -> Self {
        Self {
            items: value.items.iter().map(PermissionResponse::from).collect(),
            total: value.total,
        }
    }
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        Self {
            assignment_id: value.assignment_id().to_string(),
            user_id: value.user_id().to_string(),
            role_id: value.role_id().to_string(),
            role_name: value.role_name().as_str().to_owned(),
            created_at: value.created_at().to_rfc3339(),
            created_by: value.created_by().map(|user_id| user_id.to_string()),
        }
    }
}

impl From<AssignOutcome> for AssignRoleResponse {
    fn from(value: AssignOutcome) -> Self {
        Self {
            assignment: value.assignment.map(RoleAssignmentResponse::from),
            was_created: value.was_created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_permission_ids;

    #[test]
    fn permission_ids_must_be_uuids() {
        let valid = parse_permission_ids(&["6f9619ff-8b86-d011-b42d-00cf4fc964ff".to_owned()]);
        assert_eq!(valid.map(|ids| ids.len()).unwrap_or_default(), 1);

        assert!(parse_permission_ids(&["view_task".to_owned()]).is_err());
    }
}
