//! Per-service outcomes and batch results

use serde::{Deserialize, Serialize};

/// Why a single service's task failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The control service rejected the update call
    UpdateRejected,

    /// The service did not become stable within the polling budget
    StabilityTimeout,

    /// The stability check stopped early: service missing, draining,
    /// inactive, or the describe call itself failed
    StabilityCheckFailed,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::UpdateRejected => write!(f, "update rejected"),
            FailureKind::StabilityTimeout => write!(f, "stability timeout"),
            FailureKind::StabilityCheckFailed => write!(f, "stability check failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFailure {
    pub kind: FailureKind,
    pub reason: String,
}

/// Result of one service's update task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub service_id: String,
    pub failure: Option<ServiceFailure>,
}

impl UpdateOutcome {
    pub fn succeeded(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            failure: None,
        }
    }

    pub fn failed(service_id: impl Into<String>, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            failure: Some(ServiceFailure {
                kind,
                reason: reason.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Every outcome of one batch operation, in the order services were supplied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub cluster_id: String,
    pub outcomes: Vec<UpdateOutcome>,
}

impl BatchReport {
    pub fn new(cluster_id: impl Into<String>, outcomes: Vec<UpdateOutcome>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            outcomes,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(UpdateOutcome::is_success)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &UpdateOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &UpdateOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Ok when every service succeeded, otherwise a [`BatchFailure`]
    pub fn into_result(self) -> Result<BatchReport, BatchFailure> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BatchFailure { report: self })
        }
    }
}

/// At least one service in a batch failed
///
/// All services are always attempted, so the wrapped report also lists the
/// services that succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub report: BatchReport,
}

impl BatchFailure {
    pub fn cluster_id(&self) -> &str {
        &self.report.cluster_id
    }

    /// Failed services with their failure
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ServiceFailure)> {
        self.report
            .outcomes
            .iter()
            .filter_map(|o| o.failure.as_ref().map(|f| (o.service_id.as_str(), f)))
    }

    pub fn failed_services(&self) -> Vec<&str> {
        self.failures().map(|(service, _)| service).collect()
    }

    pub fn succeeded_services(&self) -> Vec<&str> {
        self.report
            .succeeded()
            .map(|o| o.service_id.as_str())
            .collect()
    }
}

impl std::fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = self
            .failures()
            .map(|(service, failure)| format!("{} ({}: {})", service, failure.kind, failure.reason))
            .collect::<Vec<_>>()
            .join(", ");

        write!(
            f,
            "{} of {} service(s) failed in cluster {}: {}",
            self.report.failed().count(),
            self.report.outcomes.len(),
            self.report.cluster_id,
            summary
        )
    }
}

impl std::error::Error for BatchFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_succeeded_is_ok() {
        let report = BatchReport::new(
            "prod",
            vec![UpdateOutcome::succeeded("web"), UpdateOutcome::succeeded("worker")],
        );
        let report = report.into_result().expect("batch should succeed");
        assert_eq!(report.succeeded().count(), 2);
    }

    #[test]
    fn test_any_failure_is_batch_failure() {
        let report = BatchReport::new(
            "c",
            vec![
                UpdateOutcome::succeeded("a"),
                UpdateOutcome::failed("b", FailureKind::StabilityTimeout, "not stable after 40 checks"),
            ],
        );

        let failure = report.into_result().unwrap_err();
        assert_eq!(failure.cluster_id(), "c");
        assert_eq!(failure.failed_services(), vec!["b"]);
        assert_eq!(failure.succeeded_services(), vec!["a"]);

        let (_, cause) = failure.failures().next().unwrap();
        assert_eq!(cause.kind, FailureKind::StabilityTimeout);
    }

    #[test]
    fn test_batch_failure_message_names_services() {
        let failure = BatchReport::new(
            "prod",
            vec![UpdateOutcome::failed("web", FailureKind::UpdateRejected, "ClusterNotFoundException")],
        )
        .into_result()
        .unwrap_err();

        let message = failure.to_string();
        assert!(message.starts_with("1 of 1 service(s) failed in cluster prod"));
        assert!(message.contains("web (update rejected: ClusterNotFoundException)"));
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(BatchReport::new("prod", vec![]).into_result().is_ok());
    }

    #[test]
    fn test_report_serializes_failure_kind() {
        let report = BatchReport::new(
            "prod",
            vec![UpdateOutcome::failed("web", FailureKind::UpdateRejected, "denied")],
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"][0]["failure"]["kind"], "UpdateRejected");
        assert_eq!(json["outcomes"][0]["service_id"], "web");
    }
}
