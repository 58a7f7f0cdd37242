//! Validated license key value type.
//!
//! A license key is an opaque caller-supplied string. The store never
//! generates keys; it only checks that a key is well formed before it is
//! persisted.
//!
//! The schema accepts any non-empty text. Keys created through this crate
//! are held to a stricter issuance policy: at most [`MAX_KEY_LEN`] bytes,
//! no leading or trailing whitespace, and no control characters. Rows
//! already stored by other writers are read back unchanged.

use std::fmt;

use crate::error::AppError;

/// Maximum accepted key length in bytes.
pub const MAX_KEY_LEN: usize = 128;

/// A license key that satisfies the issuance policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Validate and wrap a raw key.
    pub fn parse(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(AppError::constraint_violation("License key must not be empty"));
        }
        if raw.len() > MAX_KEY_LEN {
            return Err(AppError::constraint_violation(format!(
                "License key exceeds {MAX_KEY_LEN} bytes"
            )));
        }
        if raw.trim() != raw {
            return Err(AppError::constraint_violation(
                "License key must not start or end with whitespace",
            ));
        }
        if raw.chars().any(char::is_control) {
            return Err(AppError::constraint_violation(
                "License key must not contain control characters",
            ));
        }

        Ok(Self(raw))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
