use tasklane_application::{CreateRoleInput, PermissionPageQuery, RoleQuery, UpdateRoleInput};

use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<RoleListQuery>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .rbac_admin_service
        .list_roles(
            &principal,
            &RoleQuery {
                search: query.search,
            },
        )
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let permission_ids = parse_permission_ids(&payload.permission_ids)?;

    let role = state
        .rbac_admin_service
        .create_role(
            &principal,
            CreateRoleInput {
                name: payload.name,
                description: payload.description,
                permission_ids,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<Uuid>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .rbac_admin_service
        .get_role(&principal, RoleId::from_uuid(role_id))
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let permission_ids = payload
        .permission_ids
        .as_deref()
        .map(parse_permission_ids)
        .transpose()?;

    let role = state
        .rbac_admin_service
        .update_role(
            &principal,
            RoleId::from_uuid(role_id),
            UpdateRoleInput {
                name: payload.name,
                description: payload.description.map(Some),
                permission_ids,
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .rbac_admin_service
        .delete_role(&principal, RoleId::from_uuid(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<Uuid>,
    Query(params): Query<PermissionPageParams>,
) -> ApiResult<Json<PermissionPageResponse>> {
    let defaults = PermissionPageQuery::default();
    let limit = params.limit.unwrap_or(defaults.limit);
    if limit == 0 || limit > MAX_PERMISSION_PAGE_SIZE {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_PERMISSION_PAGE_SIZE}"
        ))
        .into());
    }

    let page = state
        .rbac_admin_service
        .list_role_permissions(
            &principal,
            RoleId::from_uuid(role_id),
            &PermissionPageQuery {
                search: params.search,
                limit,
                offset: params.offset.unwrap_or(defaults.offset),
            },
        )
        .await?;

    Ok(Json(PermissionPageResponse::from(page)))
}

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .rbac_admin_service
        .list_permission_catalog(&principal)
        .await?;

    Ok(Json(permissions.iter().map(PermissionResponse::from).collect()))
}

pub async fn autocomplete_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<RoleAutocompleteQuery>,
) -> ApiResult<Json<Vec<RoleSummaryResponse>>> {
    let roles = state
        .rbac_admin_service
        .autocomplete_roles(&principal, query.q.as_deref().unwrap_or_default())
        .await?
        .into_iter()
        .map(RoleSummaryResponse::from)
        .collect();

    Ok(Json(roles))
}
