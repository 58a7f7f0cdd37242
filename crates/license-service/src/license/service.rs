//! License operations: issuance, lookup, validation, revocation, renewal.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use license_core::config::LicenseConfig;
use license_core::error::AppError;
use license_database::LicenseStore;
use license_entity::license::{CreateLicense, License, LicenseStats, LicenseStatus};

/// Orchestrates license operations over a [`LicenseStore`].
#[derive(Clone)]
pub struct LicenseService {
    /// Backing store.
    store: Arc<dyn LicenseStore>,
    /// Issuance defaults.
    config: LicenseConfig,
}

impl std::fmt::Debug for LicenseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LicenseService {
    /// Creates a new license service.
    pub fn new(store: Arc<dyn LicenseStore>, config: LicenseConfig) -> Self {
        Self { store, config }
    }

    /// Stores a new license with an explicit expiry.
    pub async fn create(&self, req: CreateLicense) -> Result<License, AppError> {
        let key = req.key.clone();
        let license = self.store.create(req).await.inspect_err(|e| {
            warn!(key = %key, error = %e, "License creation rejected");
        })?;

        info!(
            key = %license.key,
            owner_user_id = license.owner_user_id,
            expires_at = %license.expires_at,
            "License created"
        );
        Ok(license)
    }

    /// Stores a new license that expires `duration` from now.
    ///
    /// Without a duration the configured default lifetime applies.
    pub async fn issue(
        &self,
        key: &str,
        owner_user_id: i64,
        duration: Option<TimeDelta>,
    ) -> Result<License, AppError> {
        let duration = match duration {
            Some(d) => d,
            None => self.default_duration()?,
        };
        let expires_at = Utc::now()
            .checked_add_signed(duration)
            .ok_or_else(|| AppError::constraint_violation("License duration is out of range"))?;

        self.create(CreateLicense::new(key, owner_user_id, expires_at))
            .await
    }

    /// Fetches a license by key.
    pub async fn get(&self, key: &str) -> Result<License, AppError> {
        debug!(key = %key, "Fetching license");
        self.store.get(key).await
    }

    /// Whether the license is usable at `now`.
    pub async fn is_valid(&self, key: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        self.store.is_valid(key, now).await
    }

    /// Whether the license is usable right now.
    pub async fn check(&self, key: &str) -> Result<bool, AppError> {
        self.is_valid(key, Utc::now()).await
    }

    /// Returns the license if it is usable right now.
    ///
    /// Fails with `NotFound` for unknown keys and `LicenseInvalid` for
    /// blocked or expired ones.
    pub async fn validate(&self, key: &str) -> Result<License, AppError> {
        let license = self.store.get(key).await?;
        match license.status_at(Utc::now()) {
            LicenseStatus::Active => Ok(license),
            status => {
                debug!(key = %key, %status, "License rejected");
                Err(AppError::license_invalid(format!("License '{key}' is {status}")))
            }
        }
    }

    /// Returns the license together with its status right now.
    pub async fn status(&self, key: &str) -> Result<(License, LicenseStatus), AppError> {
        let license = self.store.get(key).await?;
        let status = license.status_at(Utc::now());
        Ok((license, status))
    }

    /// Revokes a license. Blocking an already blocked license succeeds.
    pub async fn block(&self, key: &str) -> Result<(), AppError> {
        self.store.block(key).await?;
        info!(key = %key, "License blocked");
        Ok(())
    }

    /// Lifts a previous block.
    pub async fn unblock(&self, key: &str) -> Result<(), AppError> {
        self.store.set_blocked(key, false).await?;
        info!(key = %key, "License unblocked");
        Ok(())
    }

    /// Replaces the expiry instant.
    pub async fn extend_expiry(
        &self,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.store.extend_expiry(key, expires_at).await?;
        info!(key = %key, %expires_at, "License expiry updated");
        Ok(())
    }

    /// Sets the expiry to `duration` from now and returns the new instant.
    ///
    /// The block flag is left untouched.
    pub async fn renew(&self, key: &str, duration: TimeDelta) -> Result<DateTime<Utc>, AppError> {
        let expires_at = Utc::now()
            .checked_add_signed(duration)
            .ok_or_else(|| AppError::constraint_violation("License duration is out of range"))?;

        self.extend_expiry(key, expires_at).await?;
        Ok(expires_at)
    }

    /// Lists an owner's licenses, latest expiry first.
    pub async fn find_by_owner(
        &self,
        owner_user_id: i64,
        include_blocked: bool,
    ) -> Result<Vec<License>, AppError> {
        self.store.find_by_owner(owner_user_id, include_blocked).await
    }

    /// Aggregate counts at `now`.
    pub async fn stats(&self, now: DateTime<Utc>) -> Result<LicenseStats, AppError> {
        self.store.stats(now).await
    }

    fn default_duration(&self) -> Result<TimeDelta, AppError> {
        i64::try_from(self.config.default_duration_days)
            .ok()
            .and_then(TimeDelta::try_days)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "license.default_duration_days is out of range: {}",
                    self.config.default_duration_days
                ))
            })
    }
}
