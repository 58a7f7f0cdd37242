//! # license-core
//!
//! Core crate for the license server. Contains configuration schemas,
//! the license key value type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other license crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
