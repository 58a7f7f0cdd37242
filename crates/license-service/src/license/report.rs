//! Periodic license usage report.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;

use license_core::error::AppError;
use license_entity::license::LicenseStats;

use super::service::LicenseService;

/// Logs aggregate license counts on a fixed interval until cancelled.
#[derive(Debug, Clone)]
pub struct ReportTask {
    /// License service used to compute the counts.
    service: LicenseService,
    /// Time between reports.
    interval: Duration,
}

impl ReportTask {
    /// Creates a report task. A zero interval disables reporting.
    pub fn new(service: LicenseService, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Computes and logs one report.
    pub async fn report_once(&self) -> Result<LicenseStats, AppError> {
        let stats = self.service.stats(Utc::now()).await?;
        tracing::info!(
            total = stats.total,
            active = stats.active,
            expired = stats.expired,
            blocked = stats.blocked,
            "License usage report"
        );
        Ok(stats)
    }

    /// Runs until the cancel signal flips to `true` or its sender is dropped.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        if self.interval.is_zero() {
            tracing::info!("License usage report disabled");
            return;
        }

        tracing::info!(interval_seconds = self.interval.as_secs(), "License usage report started");
        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("License usage report received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.report_once().await {
                        tracing::error!(error = %e, "License usage report failed");
                    }
                }
            }
        }
    }
}
