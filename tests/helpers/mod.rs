//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use license_database::{DatabasePool, LicenseRepository, LicenseStore, MemoryLicenseStore};

/// A named store under test.
pub struct Backend {
    /// Backend label used in assertion messages.
    pub name: &'static str,
    /// The store itself.
    pub store: Arc<dyn LicenseStore>,
}

/// A migrated in-memory SQLite repository.
pub async fn sqlite_store() -> Arc<dyn LicenseStore> {
    let db = DatabasePool::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    license_database::migration::run_migrations(db.pool())
        .await
        .expect("Failed to run migrations");
    Arc::new(LicenseRepository::new(db.into_pool()))
}

/// One fresh instance of every backend.
pub async fn backends() -> Vec<Backend> {
    vec![
        Backend {
            name: "sqlite",
            store: sqlite_store().await,
        },
        Backend {
            name: "memory",
            store: Arc::new(MemoryLicenseStore::new()),
        },
    ]
}

/// Midnight UTC on the given date.
pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}
