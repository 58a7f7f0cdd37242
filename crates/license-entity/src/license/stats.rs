//! Aggregate license counts.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// License counts at a given instant.
///
/// `active + expired + blocked == total`; blocked licenses are counted as
/// blocked regardless of their expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LicenseStats {
    /// All stored licenses.
    pub total: i64,
    /// Usable licenses.
    pub active: i64,
    /// Unblocked licenses past their expiry.
    pub expired: i64,
    /// Revoked licenses.
    pub blocked: i64,
}
