use serde::{Deserialize, Serialize};

use crate::UserId;

/// User information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    email: String,
    display_name: String,
    is_superuser: bool,
    is_staff: bool,
}

impl UserIdentity {
    /// Creates a user identity from the user directory flags.
    #[must_use]
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        is_superuser: bool,
        is_staff: bool,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name: display_name.into(),
            is_superuser,
            is_staff,
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Superusers pass every permission check.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Staff users may reach the role management surface.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }
}

/// The caller of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// No authenticated session.
    Anonymous,
    /// Session bound to a known user.
    User(UserIdentity),
}

impl Principal {
    /// Returns whether the principal is bound to a user.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Returns the identity of an authenticated principal.
    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        match self {
            Self::Anonymous => None,
            Self::User(identity) => Some(identity),
        }
    }

    /// Returns the user identifier of an authenticated principal.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.identity().map(UserIdentity::user_id)
    }

    /// Returns `false` for anonymous principals.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.identity().is_some_and(UserIdentity::is_superuser)
    }

    /// Returns `false` for anonymous principals.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.identity().is_some_and(UserIdentity::is_staff)
    }
}

impl From<UserIdentity> for Principal {
    fn from(value: UserIdentity) -> Self {
        Self::User(value)
    }
}
