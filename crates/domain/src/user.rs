//! User directory value types.

use serde::{Deserialize, Serialize};
use tasklane_core::{AppError, AppResult};

/// Validated, lowercased email address used as the login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: exactly one `@`, non-empty local
    /// part, and a domain containing at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::EmailAddress;

    #[test]
    fn email_is_normalised() {
        let email = EmailAddress::new("  Alice@Tasklane.Local ");
        assert!(email.is_ok());
        assert_eq!(
            email.unwrap_or_else(|_| unreachable!()).as_str(),
            "alice@tasklane.local"
        );
    }

    #[test]
    fn email_with_two_at_signs_is_rejected() {
        assert!(EmailAddress::new("a@b@c.io").is_err());
        assert!(EmailAddress::new("@c.io").is_err());
        assert!(EmailAddress::new("a@localhost").is_err());
    }
}
