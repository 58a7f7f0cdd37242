//! The license store contract shared by every backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use license_core::result::AppResult;
use license_entity::license::{CreateLicense, License, LicenseStats};

/// Keyed storage of [`License`] records.
///
/// Implementations must guarantee:
/// - `create` checks uniqueness and inserts atomically, so concurrent
///   creates of one key yield exactly one success and `DuplicateKey` for
///   the rest;
/// - updates of a single record are applied whole or not at all;
/// - operations on a missing key fail with `NotFound` and change nothing.
#[async_trait]
pub trait LicenseStore: Send + Sync + 'static {
    /// Persist a new, unblocked license.
    async fn create(&self, new: CreateLicense) -> AppResult<License>;

    /// Fetch a license by key.
    async fn get(&self, key: &str) -> AppResult<License>;

    /// Update the block flag. Setting the current value again succeeds.
    async fn set_blocked(&self, key: &str, blocked: bool) -> AppResult<()>;

    /// Replace the expiry instant, in either direction.
    async fn extend_expiry(&self, key: &str, expires_at: DateTime<Utc>) -> AppResult<()>;

    /// All licenses of one owner, latest expiry first.
    async fn find_by_owner(
        &self,
        owner_user_id: i64,
        include_blocked: bool,
    ) -> AppResult<Vec<License>>;

    /// Aggregate counts at `now`.
    async fn stats(&self, now: DateTime<Utc>) -> AppResult<LicenseStats>;

    /// Whether the license is usable at `now`.
    async fn is_valid(&self, key: &str, now: DateTime<Utc>) -> AppResult<bool> {
        Ok(self.get(key).await?.is_valid_at(now))
    }

    /// Revoke a license.
    async fn block(&self, key: &str) -> AppResult<()> {
        self.set_blocked(key, true).await
    }
}
