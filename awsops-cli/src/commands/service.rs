//! Service command handlers
//!
//! Restart, scale and pause ECS services of one cluster. Every listed
//! service is updated in parallel and the command waits until all of them
//! are stable (or have failed) before reporting.

use anyhow::Result;
use awsops_client::{ClusterControl, EcsClusterClient};
use awsops_core::domain::outcome::{BatchFailure, BatchReport, UpdateOutcome};
use awsops_orchestrator::ClusterUpdateOrchestrator;
use clap::{Args, Subcommand};
use colored::*;
use std::sync::Arc;

use crate::config::{Config, stability_policy};

/// Stability and output options shared by every service command
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Stability checks per service before giving up
    #[arg(long, env = "AWSOPS_STABILITY_MAX_ATTEMPTS", default_value_t = 40)]
    pub max_attempts: u32,

    /// Seconds between two stability checks
    #[arg(long, env = "AWSOPS_STABILITY_DELAY_SECS", default_value_t = 15)]
    pub poll_interval_secs: u64,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Service subcommands
#[derive(Subcommand)]
pub enum ServiceCommands {
    /// Force a new deployment of each service
    Restart {
        /// Cluster name or ARN
        cluster: String,

        /// Service names or ARNs
        #[arg(required = true, num_args = 1..)]
        services: Vec<String>,

        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Force a new deployment with a new desired task count
    Scale {
        /// Cluster name or ARN
        cluster: String,

        /// Desired number of tasks per service
        #[arg(allow_negative_numbers = true)]
        count: i32,

        /// Service names or ARNs
        #[arg(required = true, num_args = 1..)]
        services: Vec<String>,

        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Scale each service down to zero tasks
    Pause {
        /// Cluster name or ARN
        cluster: String,

        /// Service names or ARNs
        #[arg(required = true, num_args = 1..)]
        services: Vec<String>,

        #[command(flatten)]
        batch: BatchArgs,
    },
}

/// Handle service commands
///
/// Builds the ECS client (exiting if that fails), runs the batch and
/// prints its outcome.
///
/// # Arguments
/// * `command` - The service command to execute
/// * `config` - The CLI configuration
pub async fn handle_service_command(command: ServiceCommands, config: &Config) -> Result<()> {
    let batch = match &command {
        ServiceCommands::Restart { batch, .. }
        | ServiceCommands::Scale { batch, .. }
        | ServiceCommands::Pause { batch, .. } => batch.clone(),
    };
    let policy = stability_policy(batch.max_attempts, batch.poll_interval_secs)?;

    let sdk_config = super::connect(config).await;
    let client: Arc<dyn ClusterControl> = Arc::new(EcsClusterClient::new(&sdk_config));
    let orchestrator = ClusterUpdateOrchestrator::with_policy(client, policy);

    let result = match command {
        ServiceCommands::Restart {
            cluster, services, ..
        } => orchestrator.restart_services(&services, &cluster).await,
        ServiceCommands::Scale {
            cluster,
            count,
            services,
            ..
        } => {
            orchestrator
                .scale_services_to(&services, &cluster, count)
                .await
        }
        ServiceCommands::Pause {
            cluster, services, ..
        } => orchestrator.pause_services(&services, &cluster).await,
    };

    report(result, batch.json)
}

/// Prints the batch outcome, failing when any service failed
fn report(result: std::result::Result<BatchReport, BatchFailure>, json: bool) -> Result<()> {
    let batch = match &result {
        Ok(report) => report,
        Err(failure) => &failure.report,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(batch)?);
    } else {
        print_report(batch);
    }

    result.map(|_| ()).map_err(anyhow::Error::from)
}

/// Print a per-service summary
fn print_report(report: &BatchReport) {
    println!(
        "{}",
        format!("Cluster {}:", report.cluster_id).bold()
    );
    for outcome in &report.outcomes {
        println!("  {}", format_outcome(outcome));
    }
    println!();

    let failed = report.failed().count();
    if failed == 0 {
        println!(
            "{}",
            format!("All {} service(s) stable.", report.outcomes.len()).green()
        );
    } else {
        println!(
            "{}",
            format!(
                "{} of {} service(s) failed.",
                failed,
                report.outcomes.len()
            )
            .red()
        );
    }
}

fn format_outcome(outcome: &UpdateOutcome) -> String {
    match &outcome.failure {
        None => format!("{} {}", "✓".green(), outcome.service_id),
        Some(failure) => format!(
            "{} {} ({}): {}",
            "✗".red(),
            outcome.service_id.bold(),
            failure.kind,
            failure.reason.dimmed()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awsops_core::domain::outcome::FailureKind;

    #[test]
    fn test_report_fails_on_batch_failure() {
        let failure = BatchReport::new(
            "c",
            vec![
                UpdateOutcome::succeeded("a"),
                UpdateOutcome::failed("b", FailureKind::StabilityTimeout, "not stable"),
            ],
        )
        .into_result()
        .unwrap_err();

        let err = report(Err(failure), true).unwrap_err();
        assert!(err.to_string().contains("1 of 2 service(s) failed in cluster c"));
        assert!(err.downcast_ref::<BatchFailure>().is_some());
    }

    #[test]
    fn test_report_succeeds_on_success() {
        let report_ok = BatchReport::new("c", vec![UpdateOutcome::succeeded("a")]);
        assert!(report(Ok(report_ok), false).is_ok());
    }

    #[test]
    fn test_format_outcome_names_failure() {
        colored::control::set_override(false);
        let outcome = UpdateOutcome::failed("web", FailureKind::UpdateRejected, "denied");
        assert_eq!(format_outcome(&outcome), "✗ web (update rejected): denied");
        assert_eq!(format_outcome(&UpdateOutcome::succeeded("api")), "✓ api");
    }
}
