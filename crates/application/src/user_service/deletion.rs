use super::*;

impl UserService {
    /// Deletes a user account. Requires the `delete_user` permission.
    ///
    /// Users may not delete their own account.
    pub async fn delete_user(&self, actor: &Principal, user_id: UserId) -> AppResult<()> {
        self.access_guard
            .require_permission(actor, "delete_user")
            .await?;

        if actor.user_id() == Some(user_id) {
            return Err(AppError::Validation(
                "users cannot delete their own account".to_owned(),
            ));
        }

        let Some(user) = self.user_repository.find_by_id(user_id).await? else {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        };

        if !self.user_repository.delete_user(user_id).await? {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        self.audit_repository
            .append_event(AuditEvent {
                actor: actor.user_id(),
                action: AuditAction::UserDeleted,
                resource_type: "user".to_owned(),
                resource_id: user_id.to_string(),
                detail: Some(format!("deleted account {}", user.email)),
            })
            .await?;

        Ok(())
    }
}
