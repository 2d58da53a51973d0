use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Outcome of an authorization predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    /// The principal may proceed.
    Allowed,
    /// The principal may not proceed.
    Denied(DenialReason),
}

impl AccessDecision {
    /// Returns whether the decision allows the action.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns the denial reason, if any.
    #[must_use]
    pub fn denial(&self) -> Option<&DenialReason> {
        match self {
            Self::Allowed => None,
            Self::Denied(reason) => Some(reason),
        }
    }
}

/// Why an authorization predicate denied access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DenialReason {
    /// No authenticated user.
    Unauthenticated,
    /// The user does not hold the named role.
    MissingRole(String),
    /// None of the user's roles grants the codename.
    MissingPermission(String),
    /// Assignment or role lookup failed; treated as a denial.
    LookupFailed,
}

impl Display for DenialReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => formatter.write_str("authentication required"),
            Self::MissingRole(role_name) => write!(formatter, "missing role '{role_name}'"),
            Self::MissingPermission(codename) => {
                write!(formatter, "missing permission '{codename}'")
            }
            Self::LookupFailed => formatter.write_str("authorization lookup failed"),
        }
    }
}
