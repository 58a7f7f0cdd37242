//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use license_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Generate a default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

/// Default configuration shipped with the server.
const DEFAULT_CONFIG: &str = include_str!("../../../../config/default.toml");

/// Write the default configuration, creating parent directories.
async fn write_default_config(out_path: &str) -> Result<(), AppError> {
    if let Some(parent) = std::path::Path::new(out_path).parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create directory: {}", e)))?;
    }
    tokio::fs::write(out_path, DEFAULT_CONFIG)
        .await
        .map_err(|e| AppError::internal(format!("Failed to write config: {}", e)))
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            match format {
                OutputFormat::Json => output::print_json(&config)?,
                OutputFormat::Table => {
                    output::print_kv("database.url", &config.database.url);
                    output::print_kv(
                        "database.max_connections",
                        &config.database.max_connections.to_string(),
                    );
                    output::print_kv("logging.level", &config.logging.level);
                    output::print_kv("logging.format", &config.logging.format);
                    output::print_kv(
                        "license.default_duration_days",
                        &config.license.default_duration_days.to_string(),
                    );
                    output::print_kv(
                        "license.report_interval_seconds",
                        &config.license.report_interval_seconds.to_string(),
                    );
                }
            }
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", config_path));
                output::print_kv("Database", &config.database.url);
                output::print_kv("Log level", &config.logging.level);
                output::print_kv(
                    "Default duration",
                    &format!("{} days", config.license.default_duration_days),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
        ConfigCommand::Generate { output: out_path } => {
            write_default_config(out_path).await?;
            output::print_success(&format!("Default config written to '{}'", out_path));
        }
    }

    Ok(())
}
