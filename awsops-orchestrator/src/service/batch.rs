//! Cluster update orchestrator
//!
//! Fans one [`UpdateOptions`] out over a list of services, one task per
//! service, and joins every task before reporting.

use awsops_client::{ClusterControl, StabilityPolicy};
use awsops_core::domain::outcome::{BatchFailure, BatchReport, FailureKind, UpdateOutcome};
use awsops_core::domain::service::{ServiceUpdateRequest, UpdateOptions};
use std::sync::Arc;
use tracing::{info, warn};

use super::update;

/// Restarts, scales and pauses services of a cluster in parallel
///
/// Holds a single client handle shared by all update tasks.
#[derive(Clone)]
pub struct ClusterUpdateOrchestrator {
    client: Arc<dyn ClusterControl>,
    policy: StabilityPolicy,
}

impl ClusterUpdateOrchestrator {
    /// Creates an orchestrator using the default stability policy
    pub fn new(client: Arc<dyn ClusterControl>) -> Self {
        Self::with_policy(client, StabilityPolicy::default())
    }

    pub fn with_policy(client: Arc<dyn ClusterControl>, policy: StabilityPolicy) -> Self {
        Self { client, policy }
    }

    /// Forces a new deployment of every service
    pub async fn restart_services<S: AsRef<str>>(
        &self,
        service_ids: &[S],
        cluster_id: &str,
    ) -> Result<BatchReport, BatchFailure> {
        self.update_services(service_ids, cluster_id, UpdateOptions::restart())
            .await
    }

    /// Forces a new deployment running `desired_count` tasks per service
    ///
    /// `desired_count` is not range-checked here; the control service
    /// rejects values it does not accept.
    pub async fn scale_services_to<S: AsRef<str>>(
        &self,
        service_ids: &[S],
        cluster_id: &str,
        desired_count: i32,
    ) -> Result<BatchReport, BatchFailure> {
        self.update_services(service_ids, cluster_id, UpdateOptions::scale_to(desired_count))
            .await
    }

    /// Scales every service down to zero tasks
    pub async fn pause_services<S: AsRef<str>>(
        &self,
        service_ids: &[S],
        cluster_id: &str,
    ) -> Result<BatchReport, BatchFailure> {
        self.update_services(service_ids, cluster_id, UpdateOptions::pause())
            .await
    }

    /// Applies `options` to every service and waits for the whole batch
    ///
    /// Services are taken as given, duplicates included. All tasks are
    /// spawned before any is awaited and every task is awaited, whatever
    /// happens to the others. Outcomes keep the order of `service_ids`.
    pub async fn update_services<S: AsRef<str>>(
        &self,
        service_ids: &[S],
        cluster_id: &str,
        options: UpdateOptions,
    ) -> Result<BatchReport, BatchFailure> {
        if service_ids.is_empty() {
            warn!(cluster = %cluster_id, "No services given, nothing to update");
            return Ok(BatchReport::new(cluster_id, Vec::new()));
        }

        info!(
            cluster = %cluster_id,
            services = service_ids.len(),
            options = %options,
            max_attempts = self.policy.max_attempts,
            max_wait_secs = self.policy.max_wait().as_secs(),
            "Dispatching service updates"
        );

        let mut handles = Vec::with_capacity(service_ids.len());
        for service_id in service_ids {
            let service_id = service_id.as_ref().to_string();
            let request = ServiceUpdateRequest::new(service_id.clone(), cluster_id, options);
            let handle = tokio::spawn(update::run(
                Arc::clone(&self.client),
                request,
                self.policy,
            ));
            handles.push((service_id, handle));
        }

        info!("... Waiting for {} service update(s) to complete", handles.len());

        let mut outcomes = Vec::with_capacity(handles.len());
        for (service_id, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Update task for {} panicked: {}", service_id, e);
                    UpdateOutcome::failed(
                        service_id,
                        FailureKind::StabilityCheckFailed,
                        format!("update task aborted: {}", e),
                    )
                }
            };
            outcomes.push(outcome);
        }

        let report = BatchReport::new(cluster_id, outcomes);
        info!(
            cluster = %cluster_id,
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            "Service updates done"
        );

        report.into_result()
    }
}
