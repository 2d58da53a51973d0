use super::*;

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .rbac_admin_service
        .list_user_assignments(&principal, UserId::from_uuid(user_id))
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn assign_user_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<(StatusCode, Json<AssignRoleResponse>)> {
    let role_id = Uuid::parse_str(payload.role_id.trim())
        .map(RoleId::from_uuid)
        .map_err(|error| AppError::Validation(format!("invalid role id: {error}")))?;

    let outcome = state
        .rbac_admin_service
        .assign_role(&principal, UserId::from_uuid(user_id), role_id)
        .await?;

    let status = if outcome.was_created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(AssignRoleResponse::from(outcome))))
}

pub async fn revoke_user_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((user_id, role_name)): Path<(Uuid, String)>,
) -> ApiResult<Json<RevokeRoleResponse>> {
    let removed = state
        .rbac_admin_service
        .revoke_role(&principal, UserId::from_uuid(user_id), role_name.as_str())
        .await?;

    Ok(Json(RevokeRoleResponse { removed }))
}

pub async fn available_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .rbac_admin_service
        .available_roles(&principal, UserId::from_uuid(user_id))
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}
