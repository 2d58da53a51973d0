use super::*;

impl UserService {
    /// Rebuilds the principal for an identity saved at login from the current user row.
    ///
    /// Deleted and inactive accounts resolve to [`Principal::Anonymous`]; surviving
    /// accounts carry their current superuser and staff flags.
    pub async fn current_principal(&self, identity: &UserIdentity) -> AppResult<Principal> {
        let user = self.user_repository.find_by_id(identity.user_id()).await?;

        Ok(match user {
            Some(user) if user.is_active => Principal::User(user.identity()),
            _ => Principal::Anonymous,
        })
    }
}
