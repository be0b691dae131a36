//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod metric;
mod service;

pub use metric::MetricCommands;
pub use service::ServiceCommands;

use anyhow::Result;
use awsops_client::SdkConfig;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Restart, scale or pause ECS services
    Service {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Publish custom CloudWatch metrics
    Metric {
        #[command(subcommand)]
        command: MetricCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Service { command } => service::handle_service_command(command, config).await,
        Commands::Metric { command } => metric::handle_metric_command(command, config).await,
    }
}

/// Resolves the AWS configuration or terminates the process
///
/// Nothing useful can happen without a client, so no partial work is
/// attempted.
async fn connect(config: &Config) -> SdkConfig {
    match config.aws.load().await {
        Ok(sdk_config) => sdk_config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
