//! License record entity model.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use license_core::error::AppError;
use license_core::types::LicenseKey;

use super::status::LicenseStatus;

/// One issued license key and its validity state.
///
/// Maps one-to-one onto a row of the `licenses` table. The owner column is
/// `tg_user_id` in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct License {
    /// License key (primary key, immutable).
    pub key: String,
    /// Telegram id of the license owner.
    #[sqlx(rename = "tg_user_id")]
    pub owner_user_id: i64,
    /// Instant after which the license is no longer valid.
    pub expires_at: DateTime<Utc>,
    /// Explicit revocation flag.
    pub is_blocked: bool,
}

impl License {
    /// Whether the license may be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_blocked && now < self.expires_at
    }

    /// Whether the expiry instant has been reached at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Derived status at `now`. A blocked license reports `Blocked` even when
    /// it has also expired.
    pub fn status_at(&self, now: DateTime<Utc>) -> LicenseStatus {
        if self.is_blocked {
            LicenseStatus::Blocked
        } else if self.is_expired_at(now) {
            LicenseStatus::Expired
        } else {
            LicenseStatus::Active
        }
    }

    /// Time left until expiry, clamped at zero.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.expires_at - now).max(TimeDelta::zero())
    }
}

/// Data required to create a new license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLicense {
    /// Caller-supplied license key.
    pub key: String,
    /// Telegram id of the owner.
    pub owner_user_id: i64,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl CreateLicense {
    /// Creates a new license request.
    pub fn new(key: impl Into<String>, owner_user_id: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            owner_user_id,
            expires_at,
        }
    }

    /// Check the request against the record constraints.
    pub fn validate(&self) -> Result<(), AppError> {
        LicenseKey::parse(self.key.as_str())?;

        if self.owner_user_id < 0 {
            return Err(AppError::constraint_violation(format!(
                "Owner user id must not be negative, got {}",
                self.owner_user_id
            )));
        }

        Ok(())
    }

    /// Build the freshly created record. New licenses are never blocked.
    pub fn into_license(self) -> License {
        License {
            key: self.key,
            owner_user_id: self.owner_user_id,
            expires_at: self.expires_at,
            is_blocked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use license_core::error::ErrorKind;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn sample() -> License {
        CreateLicense::new("ABC-123", 42, at(2025, 1, 1)).into_license()
    }

    #[test]
    fn test_new_license_is_unblocked() {
        let license = sample();
        assert_eq!(license.key, "ABC-123");
        assert_eq!(license.owner_user_id, 42);
        assert!(!license.is_blocked);
    }

    #[test]
    fn test_validity_window() {
        let license = sample();
        assert!(license.is_valid_at(at(2024, 6, 1)));
        assert!(!license.is_valid_at(at(2025, 6, 1)));
        // expiry instant itself is already invalid
        assert!(!license.is_valid_at(at(2025, 1, 1)));
    }

    #[test]
    fn test_blocked_is_never_valid() {
        let mut license = sample();
        license.is_blocked = true;
        assert!(!license.is_valid_at(at(2024, 6, 1)));
        assert_eq!(license.status_at(at(2024, 6, 1)), LicenseStatus::Blocked);
        assert_eq!(license.status_at(at(2026, 1, 1)), LicenseStatus::Blocked);
    }

    #[test]
    fn test_status_and_remaining() {
        let license = sample();
        assert_eq!(license.status_at(at(2024, 12, 31)), LicenseStatus::Active);
        assert_eq!(license.remaining_at(at(2024, 12, 31)), TimeDelta::days(1));
        assert_eq!(license.status_at(at(2025, 2, 1)), LicenseStatus::Expired);
        assert_eq!(license.remaining_at(at(2025, 2, 1)), TimeDelta::zero());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let empty = CreateLicense::new("", 42, at(2025, 1, 1));
        assert_eq!(
            empty.validate().unwrap_err().kind,
            ErrorKind::ConstraintViolation
        );

        let negative = CreateLicense::new("ABC-123", -1, at(2025, 1, 1));
        assert_eq!(
            negative.validate().unwrap_err().kind,
            ErrorKind::ConstraintViolation
        );

        assert!(CreateLicense::new("ABC-123", 0, at(2025, 1, 1)).validate().is_ok());
    }

    #[test]
    fn test_serializes_owner_field() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["owner_user_id"], 42);
        assert_eq!(json["is_blocked"], false);
    }
}
