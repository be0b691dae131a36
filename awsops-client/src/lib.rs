//! Awsops AWS clients
//!
//! Thin, type-safe wrappers around the two AWS APIs the awsops tools use:
//!
//! - [`ClusterControl`]: update ECS services and wait for them to settle
//! - [`MetricsPublisher`]: publish custom CloudWatch metrics
//!
//! Both are traits so the orchestrator and its tests can work against an
//! in-memory implementation.
//!
//! # Example
//!
//! ```no_run
//! use awsops_client::{AwsSettings, ClusterControl, EcsClusterClient, StabilityPolicy};
//! use awsops_core::domain::service::UpdateOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AwsSettings::new(Some("us-east-2".to_string()), None).load().await?;
//!     let ecs = EcsClusterClient::new(&config);
//!
//!     ecs.update_service("prod", "web", &UpdateOptions::restart()).await?;
//!     ecs.wait_until_stable("prod", &["web".to_string()], &StabilityPolicy::default())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod aws;
pub mod cluster;
pub mod ecs;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use aws::AwsSettings;
pub use aws_config::SdkConfig;
pub use cluster::{ClusterControl, StabilityError, StabilityPolicy};
pub use ecs::EcsClusterClient;
pub use error::{ClientError, Result};
pub use metrics::{CloudWatchPublisher, DEFAULT_NAMESPACE, MetricsPublisher};
