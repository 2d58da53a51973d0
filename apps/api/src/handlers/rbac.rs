use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use tasklane_core::{AppError, Principal, UserId};
use tasklane_domain::RoleId;
use uuid::Uuid;

use crate::dto::{
    AssignRoleRequest, AssignRoleResponse, CreateRoleRequest, PermissionPageParams,
    PermissionPageResponse, PermissionResponse, RevokeRoleResponse, RoleAssignmentResponse,
    RoleAutocompleteQuery, RoleListQuery, RoleResponse, RoleSummaryResponse, UpdateRoleRequest,
    parse_permission_ids,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod assignments;
mod roles;

#[cfg(test)]
mod tests;

pub use assignments::{
    assign_user_role_handler, available_roles_handler, list_user_roles_handler,
    revoke_user_role_handler,
};
pub use roles::{
    autocomplete_roles_handler, create_role_handler, delete_role_handler, get_role_handler,
    list_permissions_handler, list_role_permissions_handler, list_roles_handler,
    update_role_handler,
};

/// Upper bound for one page of a role's permissions.
const MAX_PERMISSION_PAGE_SIZE: usize = 200;
