use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

pub use conversions::parse_permission_ids;

/// Query string for role listings.
#[derive(Debug, Default, Deserialize)]
pub struct RoleListQuery {
    pub search: Option<String>,
}

/// Query string for role autocomplete.
#[derive(Debug, Default, Deserialize)]
pub struct RoleAutocompleteQuery {
    pub q: Option<String>,
}

/// Query string for a role's paginated permission listing.
#[derive(Debug, Default, Deserialize)]
pub struct PermissionPageParams {
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permission_ids: Vec<String>,
}

/// Incoming payload for partial role updates. An empty description clears it.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permission_ids: Option<Vec<String>>,
}

/// Incoming payload for assigning a role to a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub role_id: String,
}

/// API representation of a catalog permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission_id: String,
    pub resource_type: String,
    pub codename: String,
    pub name: String,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<PermissionResponse>,
    pub created_at: String,
    pub updated_at: String,
}

/// Autocomplete suggestion.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-summary-response.ts"
)]
pub struct RoleSummaryResponse {
    pub role_id: String,
    pub name: String,
}

/// One window of a role's permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-page-response.ts"
)]
pub struct PermissionPageResponse {
    pub items: Vec<PermissionResponse>,
    pub total: usize,
}

/// API representation of a role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub assignment_id: String,
    pub user_id: String,
    pub role_id: String,
    pub role_name: String,
    pub created_at: String,
    pub created_by: Option<String>,
}

/// Result of an assign request; `assignment` is absent when the role does not exist.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assign-role-response.ts"
)]
pub struct AssignRoleResponse {
    pub assignment: Option<RoleAssignmentResponse>,
    pub was_created: bool,
}

/// Result of a revoke request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/revoke-role-response.ts"
)]
pub struct RevokeRoleResponse {
    pub removed: u64,
}
