//! Shared AWS configuration loading
//!
//! Both the ECS and CloudWatch clients are built from one resolved
//! [`SdkConfig`]. Resolution follows the usual provider chain (environment,
//! profile, container/instance metadata); an explicit region or profile
//! overrides it.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use tracing::{debug, info};

use crate::error::{ClientError, Result};

/// Region the legacy helpers defaulted to when nothing else resolves
pub const FALLBACK_REGION: &str = "us-east-2";

/// Where to find the AWS account to act on
#[derive(Debug, Clone, Default)]
pub struct AwsSettings {
    /// Explicit region, takes precedence over the provider chain
    pub region: Option<String>,

    /// Named profile from the shared config files
    pub profile: Option<String>,
}

impl AwsSettings {
    pub fn new(region: Option<String>, profile: Option<String>) -> Self {
        Self { region, profile }
    }

    /// Resolves the SDK configuration and checks it is usable
    ///
    /// Fails with [`ClientError::Construction`] when no region resolves or
    /// when the credentials provider cannot produce credentials. No request
    /// is sent to any service before this succeeds.
    pub async fn load(&self) -> Result<SdkConfig> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }

        let mut config = loader.load().await;

        if config.region().is_none() {
            debug!("No region resolved, falling back to {}", FALLBACK_REGION);
            config = config
                .into_builder()
                .region(Region::new(FALLBACK_REGION))
                .build();
        }

        let provider = config.credentials_provider().ok_or_else(|| {
            ClientError::Construction("no AWS credentials provider configured".to_string())
        })?;

        provider
            .provide_credentials()
            .await
            .map_err(|e| ClientError::Construction(format!("failed to load AWS credentials: {}", e)))?;

        info!(
            region = config.region().map(|r| r.as_ref()).unwrap_or_default(),
            profile = self.profile.as_deref().unwrap_or("default"),
            "AWS configuration loaded"
        );

        Ok(config)
    }
}
