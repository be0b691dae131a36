//! Configuration module
//!
//! Handles CLI configuration: which AWS account/region to act on and how
//! long to wait for services to settle. Values come from flags with
//! environment variable fallbacks.

use anyhow::{Result, bail};
use awsops_client::{AwsSettings, StabilityPolicy};
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Region/profile used to build the AWS clients
    pub aws: AwsSettings,

    /// Output logs as JSON
    pub log_json: bool,
}

impl Config {
    pub fn new(region: Option<String>, profile: Option<String>, log_json: bool) -> Self {
        Self {
            aws: AwsSettings::new(region, profile),
            log_json,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(region) = &self.aws.region {
            if region.trim().is_empty() {
                bail!("region cannot be empty");
            }
        }

        if let Some(profile) = &self.aws.profile {
            if profile.trim().is_empty() {
                bail!("profile cannot be empty");
            }
        }

        Ok(())
    }
}

/// Builds and validates the stability policy for a batch
pub fn stability_policy(max_attempts: u32, poll_interval_secs: u64) -> Result<StabilityPolicy> {
    if max_attempts == 0 {
        bail!("max_attempts must be greater than 0");
    }

    if poll_interval_secs == 0 {
        bail!("poll_interval must be greater than 0");
    }

    Ok(StabilityPolicy::new(
        max_attempts,
        Duration::from_secs(poll_interval_secs),
    ))
}
