//! Derived license status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a license at a given instant. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Not blocked and not yet expired.
    Active,
    /// Not blocked but past its expiry instant.
    Expired,
    /// Explicitly revoked.
    Blocked,
}

impl LicenseStatus {
    /// Whether a license in this status may be used.
    pub fn is_valid(self) -> bool {
        self == Self::Active
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}
