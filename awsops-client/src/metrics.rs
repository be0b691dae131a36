//! Custom metric publishing
//!
//! Metrics are written into a single namespace chosen when the publisher is
//! created. Namespaces starting with `AWS/` are reserved for AWS services.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{
    Dimension, MetricDatum as CloudWatchDatum, StandardUnit, StatisticSet,
};
use awsops_core::domain::metric::MetricDatum;
use tracing::info;

use crate::error::{ClientError, Result};

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "CUSTOM/metrics";

/// Publishes metric data points
#[async_trait]
pub trait MetricsPublisher: Send + Sync {
    /// Validates and sends one data point
    async fn publish(&self, datum: &MetricDatum) -> Result<()>;
}

/// CloudWatch implementation of [`MetricsPublisher`]
#[derive(Debug, Clone)]
pub struct CloudWatchPublisher {
    client: aws_sdk_cloudwatch::Client,
    namespace: String,
}

impl CloudWatchPublisher {
    /// Creates a publisher writing into `namespace`
    ///
    /// # Errors
    /// Rejects empty namespaces and the reserved `AWS/` prefix.
    pub fn new(config: &SdkConfig, namespace: impl Into<String>) -> Result<Self> {
        Self::with_client(aws_sdk_cloudwatch::Client::new(config), namespace)
    }

    /// Wraps an already configured SDK client
    pub fn with_client(
        client: aws_sdk_cloudwatch::Client,
        namespace: impl Into<String>,
    ) -> Result<Self> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        Ok(Self { client, namespace })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl MetricsPublisher for CloudWatchPublisher {
    async fn publish(&self, datum: &MetricDatum) -> Result<()> {
        datum.validate()?;
        let metric = to_cloudwatch(datum);

        self.client
            .put_metric_data()
            .namespace(&self.namespace)
            .metric_data(metric)
            .send()
            .await?;

        info!(
            namespace = %self.namespace,
            metric = %datum.name,
            value = datum.value,
            unit = %datum.unit,
            "Published metric"
        );

        Ok(())
    }
}

fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.trim().is_empty() {
        return Err(ClientError::InvalidNamespace(
            "metric namespace cannot be empty".to_string(),
        ));
    }
    if namespace.starts_with("AWS/") {
        return Err(ClientError::InvalidNamespace(format!(
            "metric namespace {} uses the reserved AWS/ prefix",
            namespace
        )));
    }
    Ok(())
}

/// Converts a domain datum into the CloudWatch request shape
fn to_cloudwatch(datum: &MetricDatum) -> CloudWatchDatum {
    let dimensions = datum
        .dimensions
        .iter()
        .map(|d| Dimension::builder().name(&d.name).value(&d.value).build())
        .collect::<Vec<_>>();

    let statistics = datum.statistics.map(|s| {
        StatisticSet::builder()
            .sample_count(s.sample_count)
            .sum(s.sum)
            .minimum(s.minimum)
            .maximum(s.maximum)
            .build()
    });

    CloudWatchDatum::builder()
        .metric_name(&datum.name)
        .value(datum.value)
        .unit(StandardUnit::from(datum.unit.as_str()))
        .timestamp(DateTime::from_millis(datum.timestamp.timestamp_millis()))
        .set_dimensions(non_empty(dimensions))
        .set_values(non_empty(datum.values.clone()))
        .set_counts(non_empty(datum.counts.clone()))
        .set_statistic_values(statistics)
        .build()
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awsops_core::domain::metric::{MetricStatistics, MetricUnit};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_namespace_validation() {
        assert!(validate_namespace(DEFAULT_NAMESPACE).is_ok());
        assert!(matches!(
            validate_namespace(""),
            Err(ClientError::InvalidNamespace(_))
        ));
        let err = validate_namespace("AWS/ECS").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid metric namespace: metric namespace AWS/ECS uses the reserved AWS/ prefix"
        );
    }

    #[test]
    fn test_standard_unit_mapping() {
        assert_eq!(
            StandardUnit::from(MetricUnit::BitsPerSecond.as_str()),
            StandardUnit::BitsSecond
        );
        assert_eq!(
            StandardUnit::from(MetricUnit::Milliseconds.as_str()),
            StandardUnit::Milliseconds
        );
        assert_eq!(StandardUnit::from(MetricUnit::None.as_str()), StandardUnit::None);
    }

    #[test]
    fn test_to_cloudwatch_full_payload() {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let datum = MetricDatum::new("RequestLatency", 42.0)
            .with_unit(MetricUnit::Milliseconds)
            .with_dimension("SERVICE", "checkout")
            .with_values(vec![40.0, 44.0], vec![3.0, 1.0])
            .with_statistics(MetricStatistics {
                sample_count: 4.0,
                sum: 164.0,
                minimum: 40.0,
                maximum: 44.0,
            })
            .with_timestamp(timestamp);

        let metric = to_cloudwatch(&datum);

        assert_eq!(metric.value(), Some(42.0));
        assert_eq!(metric.unit(), Some(&StandardUnit::Milliseconds));
        assert_eq!(metric.dimensions().len(), 1);
        assert_eq!(metric.values(), &[40.0, 44.0]);
        assert_eq!(metric.counts(), &[3.0, 1.0]);
        assert_eq!(
            metric.timestamp().map(|t| t.secs()),
            Some(timestamp.timestamp())
        );

        assert!(metric.statistic_values().is_some());
    }

    #[test]
    fn test_to_cloudwatch_minimal_payload() {
        let metric = to_cloudwatch(&MetricDatum::new("Heartbeat", 1.0));
        assert!(metric.dimensions().is_empty());
        assert!(metric.values().is_empty());
        assert!(metric.statistic_values().is_none());
    }
}
