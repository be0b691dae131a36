//! Service update domain types

use serde::{Deserialize, Serialize};

/// Flags applied to a service by a single update call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Start a new deployment even if the task definition did not change
    pub force_new_deployment: bool,

    /// New desired task count, left untouched when `None`
    pub desired_count: Option<i32>,
}

impl UpdateOptions {
    /// Rolling restart: new deployment, same task count
    pub fn restart() -> Self {
        Self {
            force_new_deployment: true,
            desired_count: None,
        }
    }

    /// New deployment running `desired_count` tasks
    ///
    /// The value is passed through as-is; the control service decides
    /// whether it is acceptable.
    pub fn scale_to(desired_count: i32) -> Self {
        Self {
            force_new_deployment: true,
            desired_count: Some(desired_count),
        }
    }

    /// New deployment with zero tasks
    pub fn pause() -> Self {
        Self::scale_to(0)
    }
}

impl std::fmt::Display for UpdateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "force_new_deployment={}", self.force_new_deployment)?;
        if let Some(count) = self.desired_count {
            write!(f, ", desired_count={}", count)?;
        }
        Ok(())
    }
}

/// One service update inside a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUpdateRequest {
    pub service_id: String,
    pub cluster_id: String,
    pub options: UpdateOptions,
}

impl ServiceUpdateRequest {
    pub fn new(
        service_id: impl Into<String>,
        cluster_id: impl Into<String>,
        options: UpdateOptions,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            cluster_id: cluster_id.into(),
            options,
        }
    }
}

/// Lifecycle status reported for a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    Active,
    Draining,
    Inactive,
    /// Anything the control service reports that we do not model
    Other(String),
}

impl ServiceState {
    pub fn parse(status: &str) -> Self {
        match status {
            "ACTIVE" => ServiceState::Active,
            "DRAINING" => ServiceState::Draining,
            "INACTIVE" => ServiceState::Inactive,
            other => ServiceState::Other(other.to_string()),
        }
    }

    /// A service in this state will never become stable
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceState::Draining | ServiceState::Inactive)
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Active => write!(f, "ACTIVE"),
            ServiceState::Draining => write!(f, "DRAINING"),
            ServiceState::Inactive => write!(f, "INACTIVE"),
            ServiceState::Other(status) => write!(f, "{}", status),
        }
    }
}

/// Snapshot of a service as described by the control service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub service_name: String,
    pub state: ServiceState,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,

    /// Number of deployments currently in flight (primary included)
    pub deployment_count: usize,
}

impl ServiceStatus {
    /// Exactly one deployment and every desired task running
    pub fn is_stable(&self) -> bool {
        self.deployment_count == 1 && self.running_count == self.desired_count
    }
}

/// A service the control service could not describe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLookupFailure {
    /// ARN (or name) of the service that failed
    pub arn: String,
    /// e.g. "MISSING"
    pub reason: String,
}

impl ServiceLookupFailure {
    pub fn is_missing(&self) -> bool {
        self.reason == "MISSING"
    }
}

/// Result of describing a set of services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptions {
    pub services: Vec<ServiceStatus>,
    pub failures: Vec<ServiceLookupFailure>,
}

impl ServiceDescriptions {
    pub fn find(&self, service_id: &str) -> Option<&ServiceStatus> {
        self.services.iter().find(|s| {
            s.service_name == service_id || service_id.ends_with(&format!("/{}", s.service_name))
        })
    }
}
