use super::*;

impl UserService {
    /// Authenticates a user with email and password.
    ///
    /// Returns `AuthOutcome::Failed` for any failure (unknown email, wrong
    /// password, inactive account) to prevent enumeration.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let Ok(email) = EmailAddress::new(email) else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let Some(user) = self.user_repository.find_by_email(email.as_str()).await? else {
            // Hash anyway so unknown accounts cost the same as known ones.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let Some(stored_hash) = user.password_hash.as_deref() else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, stored_hash)?;

        if !password_valid || !user.is_active {
            tracing::info!(user_id = %user.id, "login rejected");
            return Ok(AuthOutcome::Failed);
        }

        Ok(AuthOutcome::Authenticated(user))
    }
}
