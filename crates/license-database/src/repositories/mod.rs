//! Repository implementations backed by SQLite.

pub mod license;

pub use license::LicenseRepository;
