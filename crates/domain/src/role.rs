use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasklane_core::{AppError, AppResult, UserId};
use uuid::Uuid;

use crate::CatalogPermission;

/// Name of the role that marks the administrator cohort.
pub const ADMIN_ROLE_NAME: &str = "admin";

/// Maximum number of characters in a role name.
pub const ROLE_NAME_MAX_LENGTH: usize = 100;

/// Stable role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Stable assignment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    /// Creates a random assignment identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an assignment identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AssignmentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Trimmed, non-empty role name of bounded length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_owned();

        if value.is_empty() {
            return Err(AppError::Validation(
                "role name must not be empty".to_owned(),
            ));
        }

        if value.chars().count() > ROLE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must not exceed {ROLE_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Named bundle of catalog permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    role_id: RoleId,
    name: RoleName,
    description: Option<String>,
    permissions: Vec<CatalogPermission>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a role projection. Blank descriptions are dropped and the
    /// permission set is deduplicated and ordered by key.
    #[must_use]
    pub fn new(
        role_id: RoleId,
        name: RoleName,
        description: Option<String>,
        permissions: Vec<CatalogPermission>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        let mut permissions = permissions;
        permissions.sort_by(|left, right| left.key().cmp(right.key()));
        permissions.dedup_by(|left, right| left.permission_id() == right.permission_id());

        Self {
            role_id,
            name,
            description,
            permissions,
            created_at,
            updated_at,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &RoleName {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns granted catalog permissions.
    #[must_use]
    pub fn permissions(&self) -> &[CatalogPermission] {
        self.permissions.as_slice()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `codename` is part of this role's permission set.
    #[must_use]
    pub fn has_permission(&self, codename: &str) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.codename() == codename)
    }

    /// Case-insensitive substring match on name or description. An empty needle matches.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.name.as_str().to_lowercase().contains(needle.as_str())
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(needle.as_str()))
    }
}

/// Fact that a user currently holds a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    assignment_id: AssignmentId,
    user_id: UserId,
    role_id: RoleId,
    role_name: RoleName,
    created_at: DateTime<Utc>,
    created_by: Option<UserId>,
}

impl RoleAssignment {
    /// Creates an assignment projection.
    #[must_use]
    pub fn new(
        assignment_id: AssignmentId,
        user_id: UserId,
        role_id: RoleId,
        role_name: RoleName,
        created_at: DateTime<Utc>,
        created_by: Option<UserId>,
    ) -> Self {
        Self {
            assignment_id,
            user_id,
            role_id,
            role_name,
            created_at,
            created_by,
        }
    }

    /// Returns the assignment identifier.
    #[must_use]
    pub fn assignment_id(&self) -> AssignmentId {
        self.assignment_id
    }

    /// Returns the assignee.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the assigned role.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the assigned role name.
    #[must_use]
    pub fn role_name(&self) -> &RoleName {
        &self.role_name
    }

    /// Returns when the assignment was granted.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the granting user, or `None` once that user has been removed.
    #[must_use]
    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}
