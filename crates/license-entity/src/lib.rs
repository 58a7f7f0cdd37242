//! # license-entity
//!
//! Domain entity models for the license server. [`license::License`]
//! represents a row of the `licenses` table and derives `sqlx::FromRow`;
//! the remaining types are derived values computed from it.

pub mod license;

pub use license::{CreateLicense, License, LicenseStats, LicenseStatus};
