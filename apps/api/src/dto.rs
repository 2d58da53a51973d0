mod auth;
mod common;
mod rbac;

pub use auth::{AuthLoginRequest, AuthLoginResponse};
pub use common::{AccessContextResponse, HealthResponse, MeResponse, UserIdentityResponse};
pub use rbac::{
    AssignRoleRequest, AssignRoleResponse, CreateRoleRequest, PermissionPageParams,
    PermissionPageResponse, PermissionResponse, RevokeRoleResponse, RoleAssignmentResponse,
    RoleAutocompleteQuery, RoleListQuery, RoleResponse, RoleSummaryResponse, UpdateRoleRequest,
    parse_permission_ids,
};
