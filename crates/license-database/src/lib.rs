//! # license-database
//!
//! SQLite connection management, the schema migration runner, and the
//! [`LicenseStore`] trait with its two implementations: the durable
//! [`LicenseRepository`] and the in-process [`MemoryLicenseStore`].

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryLicenseStore;
pub use repositories::LicenseRepository;
pub use store::LicenseStore;
