//! # license-service
//!
//! Business logic layer for the license server. [`LicenseService`] wraps a
//! [`license_database::LicenseStore`] and adds clock handling, default
//! durations, renewal, and structured logging. [`ReportTask`] periodically
//! logs usage counts.
//!
//! Services follow constructor injection; all dependencies are provided at
//! construction time via `Arc` references.

pub mod license;

pub use license::{LicenseService, ReportTask};
