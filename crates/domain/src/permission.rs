use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tasklane_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

/// Identifier of a permission catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionId(Uuid);

impl PermissionId {
    /// Creates a random permission identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a permission identifier from an existing UUID value.
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

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Natural key of a catalog permission: the resource type it is scoped to
/// and its codename (for example `task` / `delete_task`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionKey {
    resource_type: NonEmptyString,
    codename: NonEmptyString,
}

impl PermissionKey {
    /// Creates a validated permission key.
    pub fn new(resource_type: impl Into<String>, codename: impl Into<String>) -> AppResult<Self> {
        let resource_type = resource_type.into().trim().to_owned();
        let codename = codename.into().trim().to_owned();

        Ok(Self {
            resource_type: NonEmptyString::new(resource_type).map_err(|_| {
                AppError::Validation("permission resource type must not be empty".to_owned())
            })?,
            codename: NonEmptyString::new(codename).map_err(|_| {
                AppError::Validation("permission codename must not be empty".to_owned())
            })?,
        })
    }

    /// Parses the qualified `resource_type.codename` form.
    pub fn parse_qualified(value: &str) -> AppResult<Self> {
        let Some((resource_type, codename)) = value.split_once('.') else {
            return Err(AppError::Validation(format!(
                "permission '{value}' must use the 'resource_type.codename' form"
            )));
        };

        Self::new(resource_type, codename)
    }

    /// Returns the resource type the permission is scoped to.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.resource_type.as_str()
    }

    /// Returns the permission codename.
    #[must_use]
    pub fn codename(&self) -> &str {
        self.codename.as_str()
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}.{}", self.resource_type, self.codename)
    }
}

/// Permission row of the externally owned permission catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogPermission {
    permission_id: PermissionId,
    key: PermissionKey,
    name: String,
}

impl CatalogPermission {
    /// Creates a catalog permission projection.
    #[must_use]
    pub fn new(permission_id: PermissionId, key: PermissionKey, name: impl Into<String>) -> Self {
        Self {
            permission_id,
            key,
            name: name.into(),
        }
    }

    /// Returns the catalog identifier.
    #[must_use]
    pub fn permission_id(&self) -> PermissionId {
        self.permission_id
    }

    /// Returns the natural key.
    #[must_use]
    pub fn key(&self) -> &PermissionKey {
        &self.key
    }

    /// Returns the permission codename.
    #[must_use]
    pub fn codename(&self) -> &str {
        self.key.codename()
    }

    /// Returns the human-readable permission name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Case-insensitive substring match on name or codename. An empty needle matches.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(needle.as_str())
            || self.codename().to_lowercase().contains(needle.as_str())
    }
}
