//! Cluster control service abstraction
//!
//! [`ClusterControl`] is the seam between the update orchestrator and the
//! container service. Implementations only need to provide the update and
//! describe calls; the stability wait is built on top of `describe_services`.

use async_trait::async_trait;
use awsops_core::domain::service::{ServiceDescriptions, ServiceStatus, UpdateOptions};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Default number of stability polls before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

/// Default delay between stability polls
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(15);

/// How long to wait for services to become stable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityPolicy {
    /// Maximum number of describe calls
    pub max_attempts: u32,

    /// Sleep between two describe calls
    pub delay: Duration,
}

impl StabilityPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Upper bound on the time spent sleeping between polls
    ///
    /// Saturates at [`Duration::MAX`].
    pub fn max_wait(&self) -> Duration {
        self.delay
            .checked_mul(self.max_attempts.saturating_sub(1))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_DELAY)
    }
}

/// Why a stability wait ended without the services becoming stable
#[derive(Debug, Error)]
pub enum StabilityError {
    /// Polling budget exhausted
    #[error("services not stable after {attempts} checks: {}", .pending.join(", "))]
    Timeout {
        attempts: u32,
        /// Services that were still unstable on the last check
        pending: Vec<String>,
    },

    /// The control service does not know the service
    #[error("service {0} is missing")]
    Missing(String),

    /// The service is being deleted or is already gone
    #[error("service {service} is {state}")]
    Terminal { service: String, state: String },

    /// A describe call failed
    #[error("failed to describe services: {0}")]
    Describe(#[source] ClientError),
}

impl StabilityError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, StabilityError::Timeout { .. })
    }
}

/// Abstraction over the container service's control API
///
/// Implementations must be safe to share between concurrently running
/// update tasks.
#[async_trait]
pub trait ClusterControl: Send + Sync {
    /// Applies `options` to one service
    ///
    /// # Returns
    /// The service as reported right after the update was accepted
    async fn update_service(
        &self,
        cluster_id: &str,
        service_id: &str,
        options: &UpdateOptions,
    ) -> Result<ServiceStatus>;

    /// Describes the given services of a cluster
    async fn describe_services(
        &self,
        cluster_id: &str,
        service_ids: &[String],
    ) -> Result<ServiceDescriptions>;

    /// Polls until every listed service is stable
    ///
    /// Each poll describes the services once. The wait ends early when a
    /// service is missing, draining or inactive, or when a describe call
    /// fails. Otherwise it gives up after `policy.max_attempts` polls.
    async fn wait_until_stable(
        &self,
        cluster_id: &str,
        service_ids: &[String],
        policy: &StabilityPolicy,
    ) -> std::result::Result<(), StabilityError> {
        let mut pending: Vec<String> = service_ids.to_vec();
        let attempts = policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            let descriptions = self
                .describe_services(cluster_id, service_ids)
                .await
                .map_err(StabilityError::Describe)?;

            check_terminal(&descriptions)?;

            pending = service_ids
                .iter()
                .filter(|id| !descriptions.find(id).is_some_and(ServiceStatus::is_stable))
                .cloned()
                .collect();

            if pending.is_empty() {
                debug!(cluster = %cluster_id, attempt, "Services stable");
                return Ok(());
            }

            debug!(
                cluster = %cluster_id,
                attempt,
                max_attempts = attempts,
                pending = ?pending,
                "Services not stable yet"
            );

            if attempt < attempts {
                tokio::time::sleep(policy.delay).await;
            }
        }

        warn!(
            cluster = %cluster_id,
            pending = ?pending,
            "Gave up waiting for services after {} checks",
            attempts
        );

        Err(StabilityError::Timeout { attempts, pending })
    }
}

/// Stops the wait on states that can never become stable
fn check_terminal(descriptions: &ServiceDescriptions) -> std::result::Result<(), StabilityError> {
    if let Some(failure) = descriptions.failures.iter().find(|f| f.is_missing()) {
        return Err(StabilityError::Missing(failure.arn.clone()));
    }

    if let Some(service) = descriptions.services.iter().find(|s| s.state.is_terminal()) {
        return Err(StabilityError::Terminal {
            service: service.service_name.clone(),
            state: service.state.to_string(),
        });
    }

    Ok(())
}
