//! License operations and the periodic usage report.

pub mod report;
pub mod service;

pub use report::ReportTask;
pub use service::LicenseService;
