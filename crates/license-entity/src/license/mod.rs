//! License domain entities.

pub mod model;
pub mod stats;
pub mod status;

pub use model::{CreateLicense, License};
pub use stats::LicenseStats;
pub use status::LicenseStatus;
