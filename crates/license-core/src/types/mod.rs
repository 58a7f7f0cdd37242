//! Core type definitions used across the license workspace.

pub mod key;

pub use key::{LicenseKey, MAX_KEY_LEN};
