//! Metric command handlers

use anyhow::{Context, Result};
use awsops_client::{CloudWatchPublisher, DEFAULT_NAMESPACE, MetricsPublisher};
use awsops_core::domain::metric::{MetricDatum, MetricStatistics, MetricUnit};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Metric subcommands
#[derive(Subcommand)]
pub enum MetricCommands {
    /// Publish one data point
    Put {
        /// Metric name
        name: String,

        /// Metric value
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Unit (e.g. Count, Milliseconds, Bytes/Second)
        #[arg(short, long, default_value = "None")]
        unit: MetricUnit,

        /// Dimensions as NAME=VALUE pairs
        #[arg(short, long, value_parser = parse_key_val)]
        dimension: Vec<(String, String)>,

        /// Raw values observed during the period (comma-separated)
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Occurrences of each entry of --values (comma-separated)
        #[arg(long, value_delimiter = ',')]
        counts: Vec<f64>,

        /// Statistics as SAMPLE_COUNT,SUM,MIN,MAX
        #[arg(long, value_parser = parse_statistics, allow_negative_numbers = true)]
        stats: Option<MetricStatistics>,

        /// Timestamp (RFC 3339), defaults to now
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,

        /// Metric namespace
        #[arg(long, env = "AWSOPS_METRIC_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
        namespace: String,
    },
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid NAME=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Parse SAMPLE_COUNT,SUM,MIN,MAX
fn parse_statistics(s: &str) -> Result<MetricStatistics> {
    let parts = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid number `{}`", part))
        })
        .collect::<Result<Vec<_>>>()?;

    match parts.as_slice() {
        [sample_count, sum, minimum, maximum] => Ok(MetricStatistics {
            sample_count: *sample_count,
            sum: *sum,
            minimum: *minimum,
            maximum: *maximum,
        }),
        _ => anyhow::bail!(
            "expected SAMPLE_COUNT,SUM,MIN,MAX but got {} value(s)",
            parts.len()
        ),
    }
}

/// Handle metric commands
pub async fn handle_metric_command(command: MetricCommands, config: &Config) -> Result<()> {
    match command {
        MetricCommands::Put {
            name,
            value,
            unit,
            dimension,
            values,
            counts,
            stats,
            timestamp,
            namespace,
        } => {
            let mut datum = MetricDatum::new(name, value)
                .with_unit(unit)
                .with_values(values, counts);
            for (key, val) in dimension {
                datum = datum.with_dimension(key, val);
            }
            if let Some(stats) = stats {
                datum = datum.with_statistics(stats);
            }
            if let Some(timestamp) = timestamp {
                datum = datum.with_timestamp(timestamp);
            }

            // Reject bad payloads before touching AWS
            datum.validate()?;

            let sdk_config = super::connect(config).await;
            let publisher = CloudWatchPublisher::new(&sdk_config, namespace)?;
            put_metric(&publisher, &datum).await
        }
    }
}

async fn put_metric(publisher: &CloudWatchPublisher, datum: &MetricDatum) -> Result<()> {
    publisher
        .publish(datum)
        .await
        .with_context(|| format!("Failed to publish metric {}", datum.name))?;

    println!(
        "{} {} = {} {} → {}",
        "✓".green(),
        datum.name.bold(),
        datum.value,
        datum.unit.to_string().dimmed(),
        publisher.namespace()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("API_VERSION=0.0.BETA").unwrap(),
            ("API_VERSION".to_string(), "0.0.BETA".to_string())
        );
        assert_eq!(
            parse_key_val("QUERY=a=b").unwrap(),
            ("QUERY".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
    }

    #[test]
    fn test_parse_statistics() {
        let stats = parse_statistics("4, 164, 40, 44").unwrap();
        assert_eq!(
            stats,
            MetricStatistics {
                sample_count: 4.0,
                sum: 164.0,
                minimum: 40.0,
                maximum: 44.0,
            }
        );

        assert!(parse_statistics("1,2,3").is_err());
        assert!(parse_statistics("1,2,x,4").is_err());
    }
}
