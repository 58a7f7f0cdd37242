//! CLI command definitions and dispatch.

pub mod config;
pub mod license;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use license_core::config::AppConfig;
use license_core::error::AppError;
use license_database::{DatabasePool, LicenseRepository};
use license_service::LicenseService;

/// License server administration
#[derive(Debug, Parser)]
#[command(name = "license-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// License management
    License(license::LicenseArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config, self.format).await,
            Commands::License(args) => license::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: build the license service over the configured database
pub async fn create_license_service(config: &AppConfig) -> Result<LicenseService, AppError> {
    let pool = create_db_pool(config).await?;
    license_database::migration::run_migrations(pool.pool()).await?;
    let repo = LicenseRepository::new(pool.into_pool());
    Ok(LicenseService::new(Arc::new(repo), config.license.clone()))
}
