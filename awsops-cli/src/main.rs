//! Awsops CLI
//!
//! Command-line interface for day-to-day ECS and CloudWatch chores:
//! rolling restarts, scaling and pausing of services, and publishing
//! custom metrics.

mod commands;
mod config;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "awsops")]
#[command(about = "ECS service rollouts and CloudWatch metrics", long_about = None)]
struct Cli {
    /// AWS region (defaults to the provider chain, then us-east-2)
    #[arg(long, global = true, env = "AWS_REGION")]
    region: Option<String>,

    /// Named AWS profile
    #[arg(long, global = true, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Output logs in JSON format
    #[arg(long, global = true, env = "AWSOPS_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = Config::new(cli.region, cli.profile, cli.log_json);
    init_tracing(config.log_json);

    let result = match config.validate() {
        Ok(()) => handle_command(cli.command, &config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Initialize logging
///
/// Logs go to stderr so that command output on stdout stays parseable.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "awsops=info,awsops_client=info,awsops_orchestrator=info".into());

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{MetricCommands, ServiceCommands};
    use awsops_core::domain::metric::MetricUnit;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_restart() {
        let cli = Cli::try_parse_from([
            "awsops", "--region", "eu-west-1", "service", "restart", "prod", "web", "worker",
        ])
        .unwrap();

        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        match cli.command {
            Commands::Service {
                command:
                    ServiceCommands::Restart {
                        cluster,
                        services,
                        batch,
                    },
            } => {
                assert_eq!(cluster, "prod");
                assert_eq!(services, vec!["web", "worker"]);
                assert_eq!(batch.max_attempts, 40);
                assert_eq!(batch.poll_interval_secs, 15);
            }
            _ => panic!("expected service restart"),
        }
    }

    #[test]
    fn test_parse_scale() {
        let cli = Cli::try_parse_from([
            "awsops", "service", "scale", "prod", "3", "web", "api", "--max-attempts", "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Service {
                command:
                    ServiceCommands::Scale {
                        cluster,
                        count,
                        services,
                        batch,
                    },
            } => {
                assert_eq!(cluster, "prod");
                assert_eq!(count, 3);
                assert_eq!(services, vec!["web", "api"]);
                assert_eq!(batch.max_attempts, 10);
            }
            _ => panic!("expected service scale"),
        }
    }

    #[test]
    fn test_scale_requires_count_before_services() {
        assert!(Cli::try_parse_from(["awsops", "service", "scale", "prod", "web"]).is_err());
    }

    #[test]
    fn test_pause_requires_services() {
        assert!(Cli::try_parse_from(["awsops", "service", "pause", "prod"]).is_err());
    }

    #[test]
    fn test_parse_metric_put() {
        let cli = Cli::try_parse_from([
            "awsops",
            "metric",
            "put",
            "MyCustomMetric",
            "1500.1337",
            "--unit",
            "milliseconds",
            "--dimension",
            "API_VERSION=0.0.BETA",
            "--values",
            "1,2",
            "--counts",
            "5,6",
        ])
        .unwrap();

        match cli.command {
            Commands::Metric {
                command:
                    MetricCommands::Put {
                        name,
                        value,
                        unit,
                        dimension,
                        values,
                        counts,
                        namespace,
                        ..
                    },
            } => {
                assert_eq!(name, "MyCustomMetric");
                assert_eq!(value, 1500.1337);
                assert_eq!(unit, MetricUnit::Milliseconds);
                assert_eq!(
                    dimension,
                    vec![("API_VERSION".to_string(), "0.0.BETA".to_string())]
                );
                assert_eq!(values, vec![1.0, 2.0]);
                assert_eq!(counts, vec![5.0, 6.0]);
                assert_eq!(namespace, "CUSTOM/metrics");
            }
            _ => panic!("expected metric put"),
        }
    }
}
