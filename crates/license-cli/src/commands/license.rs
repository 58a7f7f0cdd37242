//! License management CLI commands.

use chrono::{DateTime, Utc};
use clap::{ArgGroup, Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use crate::time::{format_duration, format_instant, parse_duration, parse_instant};
use license_core::error::AppError;
use license_entity::license::{CreateLicense, License, LicenseStats};

/// Arguments for license commands
#[derive(Debug, Args)]
pub struct LicenseArgs {
    /// License subcommand
    #[command(subcommand)]
    pub command: LicenseCommand,
}

/// Expiry given either as an instant or as a duration from now
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("expiry").args(["expires", "duration"])))]
pub struct ExpiryArgs {
    /// Absolute expiry (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub expires: Option<String>,
    /// Lifetime from now (e.g. 30d, 2w, 1h30m)
    #[arg(long)]
    pub duration: Option<String>,
}

/// License subcommands
#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// Create a license (defaults to the configured lifetime)
    Create {
        /// License key
        #[arg(long)]
        key: String,
        /// Telegram user id of the owner
        #[arg(long)]
        owner: i64,
        /// Expiry
        #[command(flatten)]
        expiry: ExpiryArgs,
    },
    /// Show a license
    Get {
        /// License key
        key: String,
    },
    /// Check whether a license is valid
    Check {
        /// License key
        key: String,
        /// Instant to check at (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Block a license
    Block {
        /// License key
        key: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Unblock a license
    Unblock {
        /// License key
        key: String,
    },
    /// Set a new expiry
    Extend {
        /// License key
        key: String,
        /// New expiry
        #[command(flatten)]
        expiry: ExpiryArgs,
    },
    /// Set the expiry to a duration from now
    Renew {
        /// License key
        key: String,
        /// Lifetime from now (e.g. 30d, 2w, 1h30m)
        #[arg(long)]
        duration: String,
    },
    /// List the licenses of an owner
    List {
        /// Telegram user id of the owner
        #[arg(long)]
        owner: i64,
        /// Include blocked licenses
        #[arg(long)]
        all: bool,
    },
    /// Show license counts
    Stats,
}

/// License display row for table output
#[derive(Debug, Serialize, Tabled)]
struct LicenseRow {
    /// Key
    key: String,
    /// Owner
    owner_user_id: i64,
    /// Expires at
    expires_at: String,
    /// Status
    status: String,
    /// Remaining
    remaining: String,
}

impl LicenseRow {
    fn new(license: &License, now: DateTime<Utc>) -> Self {
        Self {
            key: license.key.clone(),
            owner_user_id: license.owner_user_id,
            expires_at: format_instant(license.expires_at),
            status: license.status_at(now).to_string(),
            remaining: format_duration(license.remaining_at(now)),
        }
    }
}

/// Stats display row for table output
#[derive(Debug, Serialize, Tabled)]
struct StatsRow {
    /// Total
    total: i64,
    /// Active
    active: i64,
    /// Expired
    expired: i64,
    /// Blocked
    blocked: i64,
}

impl From<LicenseStats> for StatsRow {
    fn from(stats: LicenseStats) -> Self {
        Self {
            total: stats.total,
            active: stats.active,
            expired: stats.expired,
            blocked: stats.blocked,
        }
    }
}

/// Resolve the expiry arguments. `None` means neither flag was given.
fn resolve_expiry(expiry: &ExpiryArgs) -> Result<Option<DateTime<Utc>>, AppError> {
    if let Some(expires) = &expiry.expires {
        return parse_instant(expires).map(Some);
    }
    if let Some(duration) = &expiry.duration {
        let duration = parse_duration(duration)?;
        return Utc::now()
            .checked_add_signed(duration)
            .map(Some)
            .ok_or_else(|| AppError::constraint_violation("Duration is out of range"));
    }
    Ok(None)
}

/// Execute license commands
pub async fn execute(
    args: &LicenseArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let service = super::create_license_service(&config).await?;
    let now = Utc::now();

    match &args.command {
        LicenseCommand::Create { key, owner, expiry } => {
            let license = match resolve_expiry(expiry)? {
                Some(expires_at) => {
                    service
                        .create(CreateLicense::new(key.as_str(), *owner, expires_at))
                        .await?
                }
                None => service.issue(key, *owner, None).await?,
            };
            output::print_row(&LicenseRow::new(&license, now), format)?;
        }
        LicenseCommand::Get { key } => {
            let license = service.get(key).await?;
            output::print_row(&LicenseRow::new(&license, now), format)?;
        }
        LicenseCommand::Check { key, at } => {
            let at = match at {
                Some(at) => parse_instant(at)?,
                None => now,
            };
            let valid = service.is_valid(key, at).await?;
            match format {
                OutputFormat::Json => {
                    let report = serde_json::json!({ "key": key, "at": at, "valid": valid });
                    output::print_json(&report)?;
                }
                OutputFormat::Table => {
                    if valid {
                        output::print_success(&format!("License '{}' is valid", key));
                    } else {
                        output::print_warning(&format!("License '{}' is not valid", key));
                    }
                }
            }
        }
        LicenseCommand::Block { key, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Block license '{}'?", key))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            service.block(key).await?;
            output::print_success(&format!("License '{}' blocked", key));
        }
        LicenseCommand::Unblock { key } => {
            service.unblock(key).await?;
            output::print_success(&format!("License '{}' unblocked", key));
        }
        LicenseCommand::Extend { key, expiry } => {
            let expires_at = resolve_expiry(expiry)?.ok_or_else(|| {
                AppError::constraint_violation("Either --expires or --duration is required")
            })?;
            service.extend_expiry(key, expires_at).await?;
            output::print_success(&format!(
                "License '{}' now expires at {}",
                key,
                format_instant(expires_at)
            ));
        }
        LicenseCommand::Renew { key, duration } => {
            let expires_at = service.renew(key, parse_duration(duration)?).await?;
            output::print_success(&format!(
                "License '{}' renewed until {}",
                key,
                format_instant(expires_at)
            ));
        }
        LicenseCommand::List { owner, all } => {
            let rows: Vec<LicenseRow> = service
                .find_by_owner(*owner, *all)
                .await?
                .iter()
                .map(|license| LicenseRow::new(license, now))
                .collect();
            output::print_rows(&rows, format)?;
        }
        LicenseCommand::Stats => {
            let stats = service.stats(now).await?;
            output::print_row(&StatsRow::from(stats), format)?;
        }
    }

    Ok(())
}
