//! License repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use license_core::error::{AppError, ErrorKind};
use license_core::result::AppResult;
use license_entity::license::{CreateLicense, License, LicenseStats};

use crate::store::LicenseStore;

const SELECT_COLUMNS: &str = "SELECT key, tg_user_id, expires_at, is_blocked FROM licenses";

/// Durable repository for license records.
#[derive(Debug, Clone)]
pub struct LicenseRepository {
    pool: SqlitePool,
}

impl LicenseRepository {
    /// Create a new license repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a license by key.
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>(&format!("{SELECT_COLUMNS} WHERE key = ?"))
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find license", e))
    }

    /// Count all stored licenses.
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM licenses")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count licenses", e)
            })?;
        Ok(count as u64)
    }
}

fn not_found(key: &str) -> AppError {
    AppError::not_found(format!("License '{key}' not found"))
}

fn map_insert_error(key: &str, err: sqlx::Error) -> AppError {
    let duplicate = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if duplicate {
        AppError::duplicate_key(format!("License key '{key}' already exists"))
    } else {
        AppError::with_source(ErrorKind::Database, "Failed to create license", err)
    }
}

#[async_trait]
impl LicenseStore for LicenseRepository {
    async fn create(&self, new: CreateLicense) -> AppResult<License> {
        new.validate()?;

        // Uniqueness is enforced by the primary key inside this single statement.
        sqlx::query_as::<_, License>(
            "INSERT INTO licenses (key, tg_user_id, expires_at) VALUES (?, ?, ?) \
             RETURNING key, tg_user_id, expires_at, is_blocked",
        )
        .bind(&new.key)
        .bind(new.owner_user_id)
        .bind(new.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(&new.key, e))
    }

    async fn get(&self, key: &str) -> AppResult<License> {
        self.find_by_key(key).await?.ok_or_else(|| not_found(key))
    }

    async fn set_blocked(&self, key: &str, blocked: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE licenses SET is_blocked = ? WHERE key = ?")
            .bind(blocked)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update block flag", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found(key));
        }
        debug!(key = %key, blocked, "Block flag written");
        Ok(())
    }

    async fn extend_expiry(&self, key: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query("UPDATE licenses SET expires_at = ? WHERE key = ?")
            .bind(expires_at)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update expiry", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(key));
        }
        debug!(key = %key, %expires_at, "Expiry written");
        Ok(())
    }

    async fn find_by_owner(
        &self,
        owner_user_id: i64,
        include_blocked: bool,
    ) -> AppResult<Vec<License>> {
        let filter = if include_blocked {
            ""
        } else {
            " AND is_blocked = FALSE"
        };
        let sql = format!(
            "{SELECT_COLUMNS} WHERE tg_user_id = ?{filter} ORDER BY julianday(expires_at) DESC"
        );

        sqlx::query_as::<_, License>(&sql)
            .bind(owner_user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list owner licenses", e)
            })
    }

    async fn stats(&self, now: DateTime<Utc>) -> AppResult<LicenseStats> {
        // Rows written by other tools may use SQLite's `YYYY-MM-DD HH:MM:SS`
        // form, so instants are compared as julian days, never as text.
        sqlx::query_as::<_, LicenseStats>(
            "SELECT \
                COUNT(*) AS total, \
                COALESCE(SUM(CASE WHEN is_blocked = FALSE \
                    AND julianday(expires_at) > julianday(?) THEN 1 ELSE 0 END), 0) AS active, \
                COALESCE(SUM(CASE WHEN is_blocked = FALSE \
                    AND julianday(expires_at) <= julianday(?) THEN 1 ELSE 0 END), 0) AS expired, \
                COALESCE(SUM(CASE WHEN is_blocked = TRUE THEN 1 ELSE 0 END), 0) AS blocked \
             FROM licenses",
        )
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to compute stats", e))
    }
}
