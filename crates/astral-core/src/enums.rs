//! Role enum and its access hierarchy.
//!
//! Serialized as `snake_case` strings, which is also the SQL storage format.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application role copied from the identity provider's public metadata.
///
/// Roles are ordered: `student < teacher < admin`. A role-gated function
/// admits any user whose role ranks at or above the required one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Position in the hierarchy. Higher ranks include lower ones.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Student => 1,
            Self::Teacher => 2,
            Self::Admin => 3,
        }
    }

    /// Whether this role satisfies a requirement of `required`.
    #[must_use]
    pub const fn satisfies(self, required: Self) -> bool {
        self.rank() >= required.rank()
    }

    /// Teachers and admins manage class content.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
