//! ECS implementation of [`ClusterControl`]

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ecs::types::Service;
use awsops_core::domain::service::{
    ServiceDescriptions, ServiceLookupFailure, ServiceState, ServiceStatus, UpdateOptions,
};
use tracing::debug;

use crate::cluster::ClusterControl;
use crate::error::{ClientError, Result};

/// ECS accepts at most this many services per DescribeServices call
const DESCRIBE_BATCH_SIZE: usize = 10;

/// Cluster control backed by the ECS API
///
/// The underlying SDK client is cheap to clone and safe to share between
/// concurrent update tasks.
#[derive(Debug, Clone)]
pub struct EcsClusterClient {
    client: aws_sdk_ecs::Client,
}

impl EcsClusterClient {
    /// Builds a client from a resolved SDK configuration
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecs::Client::new(config),
        }
    }
}

#[async_trait]
impl ClusterControl for EcsClusterClient {
    async fn update_service(
        &self,
        cluster_id: &str,
        service_id: &str,
        options: &UpdateOptions,
    ) -> Result<ServiceStatus> {
        debug!(
            cluster = %cluster_id,
            service = %service_id,
            options = %options,
            "UpdateService"
        );

        let output = self
            .client
            .update_service()
            .cluster(cluster_id)
            .service(service_id)
            .force_new_deployment(options.force_new_deployment)
            .set_desired_count(options.desired_count)
            .send()
            .await?;

        let service = output.service().ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "UpdateService returned no service for {}::{}",
                cluster_id, service_id
            ))
        })?;

        Ok(service_status(service, service_id))
    }

    async fn describe_services(
        &self,
        cluster_id: &str,
        service_ids: &[String],
    ) -> Result<ServiceDescriptions> {
        let mut descriptions = ServiceDescriptions::default();

        for chunk in service_ids.chunks(DESCRIBE_BATCH_SIZE) {
            let output = self
                .client
                .describe_services()
                .cluster(cluster_id)
                .set_services(Some(chunk.to_vec()))
                .send()
                .await?;

            descriptions.services.extend(
                output
                    .services()
                    .iter()
                    .map(|service| service_status(service, "")),
            );
            descriptions
                .failures
                .extend(output.failures().iter().map(|failure| ServiceLookupFailure {
                    arn: failure.arn().unwrap_or_default().to_string(),
                    reason: failure.reason().unwrap_or_default().to_string(),
                }));
        }

        debug!(
            cluster = %cluster_id,
            described = descriptions.services.len(),
            failures = descriptions.failures.len(),
            "Described services"
        );

        Ok(descriptions)
    }
}

/// Maps an SDK service onto the domain snapshot
///
/// `fallback_name` is used when the response omits the service name.
fn service_status(service: &Service, fallback_name: &str) -> ServiceStatus {
    ServiceStatus {
        service_name: service
            .service_name()
            .unwrap_or(fallback_name)
            .to_string(),
        state: ServiceState::parse(service.status().unwrap_or_default()),
        desired_count: service.desired_count(),
        running_count: service.running_count(),
        pending_count: service.pending_count(),
        deployment_count: service.deployments().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecs::types::Deployment;

    #[test]
    fn test_service_status_mapping() {
        let service = Service::builder()
            .service_name("web")
            .status("ACTIVE")
            .desired_count(3)
            .running_count(3)
            .pending_count(0)
            .deployments(Deployment::builder().status("PRIMARY").build())
            .build();

        let status = service_status(&service, "fallback");
        assert_eq!(status.service_name, "web");
        assert_eq!(status.state, ServiceState::Active);
        assert_eq!(status.deployment_count, 1);
        assert!(status.is_stable());
    }

    #[test]
    fn test_service_status_during_rollout() {
        let service = Service::builder()
            .status("ACTIVE")
            .desired_count(2)
            .running_count(2)
            .deployments(Deployment::builder().status("PRIMARY").build())
            .deployments(Deployment::builder().status("ACTIVE").build())
            .build();

        let status = service_status(&service, "worker");
        assert_eq!(status.service_name, "worker");
        assert_eq!(status.deployment_count, 2);
        assert!(!status.is_stable());
    }

    #[test]
    fn test_client_construction() {
        let config = SdkConfig::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new("us-east-2"))
            .build();
        let _client = EcsClusterClient::new(&config);
    }
}
