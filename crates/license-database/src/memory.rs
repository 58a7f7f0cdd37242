//! In-memory license store for single-node deployments and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use license_core::error::AppError;
use license_core::result::AppResult;
use license_entity::license::{CreateLicense, License, LicenseStats, LicenseStatus};

use crate::store::LicenseStore;

/// Concurrent in-process license store.
///
/// Records live in a sharded map; each operation holds one shard lock for
/// its whole duration, which makes create-if-absent and single-record
/// updates atomic. Contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryLicenseStore {
    licenses: Arc<DashMap<String, License>>,
}

impl MemoryLicenseStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored licenses.
    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    /// Whether the store holds no licenses.
    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }

    fn update<F>(&self, key: &str, apply: F) -> AppResult<()>
    where
        F: FnOnce(&mut License),
    {
        let mut license = self
            .licenses
            .get_mut(key)
            .ok_or_else(|| AppError::not_found(format!("License '{key}' not found")))?;
        apply(license.value_mut());
        Ok(())
    }
}

#[async_trait]
impl LicenseStore for MemoryLicenseStore {
    async fn create(&self, new: CreateLicense) -> AppResult<License> {
        new.validate()?;

        match self.licenses.entry(new.key.clone()) {
            Entry::Occupied(_) => Err(AppError::duplicate_key(format!(
                "License key '{}' already exists",
                new.key
            ))),
            Entry::Vacant(slot) => {
                let license = new.into_license();
                slot.insert(license.clone());
                Ok(license)
            }
        }
    }

    async fn get(&self, key: &str) -> AppResult<License> {
        self.licenses
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("License '{key}' not found")))
    }

    async fn set_blocked(&self, key: &str, blocked: bool) -> AppResult<()> {
        self.update(key, |license| license.is_blocked = blocked)
    }

    async fn extend_expiry(&self, key: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        self.update(key, |license| license.expires_at = expires_at)
    }

    async fn find_by_owner(
        &self,
        owner_user_id: i64,
        include_blocked: bool,
    ) -> AppResult<Vec<License>> {
        let mut licenses: Vec<License> = self
            .licenses
            .iter()
            .filter(|entry| entry.owner_user_id == owner_user_id)
            .filter(|entry| include_blocked || !entry.is_blocked)
            .map(|entry| entry.value().clone())
            .collect();

        licenses.sort_by(|a, b| b.expires_at.cmp(&a.expires_at));
        Ok(licenses)
    }

    async fn stats(&self, now: DateTime<Utc>) -> AppResult<LicenseStats> {
        let mut stats = LicenseStats::default();
        for entry in self.licenses.iter() {
            stats.total += 1;
            match entry.status_at(now) {
                LicenseStatus::Active => stats.active += 1,
                LicenseStatus::Expired => stats.expired += 1,
                LicenseStatus::Blocked => stats.blocked += 1,
            }
        }
        Ok(stats)
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

    #[tokio::test]
    async fn test_create_rejects_duplicate() {
        let store = MemoryLicenseStore::new();
        store
            .create(CreateLicense::new("ABC-123", 42, at(2025, 1, 1)))
            .await
            .expect("create");

        let err = store
            .create(CreateLicense::new("ABC-123", 99, at(2026, 1, 1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateKey);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("ABC-123").await.expect("get").owner_user_id, 42);
    }

    #[tokio::test]
    async fn test_updates_and_not_found() {
        let store = MemoryLicenseStore::new();
        store
            .create(CreateLicense::new("ABC-123", 42, at(2025, 1, 1)))
            .await
            .expect("create");

        store.extend_expiry("ABC-123", at(2030, 1, 1)).await.expect("extend");
        store.block("ABC-123").await.expect("block");
        let license = store.get("ABC-123").await.expect("get");
        assert_eq!(license.expires_at, at(2030, 1, 1));
        assert!(license.is_blocked);

        assert_eq!(store.block("nope").await.unwrap_err().kind, ErrorKind::NotFound);
        assert!(store.get("nope").await.is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_single_winner() {
        let store = MemoryLicenseStore::new();
        let mut handles = Vec::new();
        for owner in 0..16_i64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create(CreateLicense::new("RACE", owner, at(2030, 1, 1)))
                    .await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            match handle.await.expect("join") {
                Ok(_) => wins += 1,
                Err(e) => assert_eq!(e.kind, ErrorKind::DuplicateKey),
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_partition() {
        let store = MemoryLicenseStore::new();
        store.create(CreateLicense::new("A", 1, at(2025, 1, 1))).await.expect("A");
        store.create(CreateLicense::new("B", 1, at(2024, 1, 1))).await.expect("B");
        store.create(CreateLicense::new("C", 2, at(2024, 1, 1))).await.expect("C");
        store.block("C").await.expect("block");

        let stats = store.stats(at(2024, 6, 1)).await.expect("stats");
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.blocked, 1);
    }
}
