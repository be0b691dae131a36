//! Single-service update task

use awsops_client::{ClusterControl, StabilityPolicy};
use awsops_core::domain::outcome::{FailureKind, UpdateOutcome};
use awsops_core::domain::service::ServiceUpdateRequest;
use std::sync::Arc;
use tracing::{error, info};

/// Updates one service and waits for it to become stable
///
/// Never fails: every error is folded into the returned outcome. A rejected
/// update is not followed by a stability wait.
pub(crate) async fn run(
    client: Arc<dyn ClusterControl>,
    request: ServiceUpdateRequest,
    policy: StabilityPolicy,
) -> UpdateOutcome {
    let ServiceUpdateRequest {
        service_id,
        cluster_id,
        options,
    } = request;

    info!("Starting update of service '{}::{}'", cluster_id, service_id);

    if let Err(e) = client
        .update_service(&cluster_id, &service_id, &options)
        .await
    {
        error!(
            code = e.code().unwrap_or("unknown"),
            "Update of '{}::{}' rejected: {}",
            cluster_id, service_id, e
        );
        return UpdateOutcome::failed(service_id, FailureKind::UpdateRejected, e.to_string());
    }

    let services = [service_id.clone()];
    match client
        .wait_until_stable(&cluster_id, &services, &policy)
        .await
    {
        Ok(()) => {
            info!("Finished updating '{}::{}'", cluster_id, service_id);
            UpdateOutcome::succeeded(service_id)
        }
        Err(e) => {
            error!(
                "Failed updating service '{}::{}': {}",
                cluster_id, service_id, e
            );
            let kind = if e.is_timeout() {
                FailureKind::StabilityTimeout
            } else {
                FailureKind::StabilityCheckFailed
            };
            UpdateOutcome::failed(service_id, kind, e.to_string())
        }
    }
}
