//! License issuance and reporting configuration.

use serde::{Deserialize, Serialize};

/// License system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Lifetime in days applied when a license is issued without an explicit duration.
    #[serde(default = "default_duration_days")]
    pub default_duration_days: u64,
    /// How often the server logs a license usage report.
    #[serde(default = "default_report_interval")]
    pub report_interval_seconds: u64,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            default_duration_days: default_duration_days(),
            report_interval_seconds: default_report_interval(),
        }
    }
}

fn default_duration_days() -> u64 {
    30
}

fn default_report_interval() -> u64 {
    3600
}
