//! Custom metric data model
//!
//! A [`MetricDatum`] describes one data point published into a metrics
//! namespace. Dimensions form part of the metric identity; `values`/`counts`
//! and `statistics` are the optional aggregated forms accepted alongside the
//! single value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unit attached to a metric value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricUnit {
    #[default]
    None,
    Percent,
    Count,
    Seconds,
    Microseconds,
    Milliseconds,
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
    Bits,
    Kilobits,
    Megabits,
    Gigabits,
    Terabits,
    BytesPerSecond,
    KilobytesPerSecond,
    MegabytesPerSecond,
    GigabytesPerSecond,
    TerabytesPerSecond,
    BitsPerSecond,
    KilobitsPerSecond,
    MegabitsPerSecond,
    GigabitsPerSecond,
    TerabitsPerSecond,
    CountPerSecond,
}

impl MetricUnit {
    pub const ALL: [MetricUnit; 27] = [
        MetricUnit::None,
        MetricUnit::Percent,
        MetricUnit::Count,
        MetricUnit::Seconds,
        MetricUnit::Microseconds,
        MetricUnit::Milliseconds,
        MetricUnit::Bytes,
        MetricUnit::Kilobytes,
        MetricUnit::Megabytes,
        MetricUnit::Gigabytes,
        MetricUnit::Terabytes,
        MetricUnit::Bits,
        MetricUnit::Kilobits,
        MetricUnit::Megabits,
        MetricUnit::Gigabits,
        MetricUnit::Terabits,
        MetricUnit::BytesPerSecond,
        MetricUnit::KilobytesPerSecond,
        MetricUnit::MegabytesPerSecond,
        MetricUnit::GigabytesPerSecond,
        MetricUnit::TerabytesPerSecond,
        MetricUnit::BitsPerSecond,
        MetricUnit::KilobitsPerSecond,
        MetricUnit::MegabitsPerSecond,
        MetricUnit::GigabitsPerSecond,
        MetricUnit::TerabitsPerSecond,
        MetricUnit::CountPerSecond,
    ];

    /// Wire name of the unit
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricUnit::None => "None",
            MetricUnit::Percent => "Percent",
            MetricUnit::Count => "Count",
            MetricUnit::Seconds => "Seconds",
            MetricUnit::Microseconds => "Microseconds",
            MetricUnit::Milliseconds => "Milliseconds",
            MetricUnit::Bytes => "Bytes",
            MetricUnit::Kilobytes => "Kilobytes",
            MetricUnit::Megabytes => "Megabytes",
            MetricUnit::Gigabytes => "Gigabytes",
            MetricUnit::Terabytes => "Terabytes",
            MetricUnit::Bits => "Bits",
            MetricUnit::Kilobits => "Kilobits",
            MetricUnit::Megabits => "Megabits",
            MetricUnit::Gigabits => "Gigabits",
            MetricUnit::Terabits => "Terabits",
            MetricUnit::BytesPerSecond => "Bytes/Second",
            MetricUnit::KilobytesPerSecond => "Kilobytes/Second",
            MetricUnit::MegabytesPerSecond => "Megabytes/Second",
            MetricUnit::GigabytesPerSecond => "Gigabytes/Second",
            MetricUnit::TerabytesPerSecond => "Terabytes/Second",
            MetricUnit::BitsPerSecond => "Bits/Second",
            MetricUnit::KilobitsPerSecond => "Kilobits/Second",
            MetricUnit::MegabitsPerSecond => "Megabits/Second",
            MetricUnit::GigabitsPerSecond => "Gigabits/Second",
            MetricUnit::TerabitsPerSecond => "Terabits/Second",
            MetricUnit::CountPerSecond => "Count/Second",
        }
    }
}

impl std::fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricUnit {
    type Err = MetricError;

    /// Accepts the wire name case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricUnit::ALL
            .iter()
            .copied()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| MetricError::UnknownUnit(s.to_string()))
    }
}

/// Name/value pair that is part of a metric's identity
///
/// e.g. `PURCHASE_SERVICE=MyCoolService`, `APP_VERSION=1.0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDimension {
    pub name: String,
    pub value: String,
}

impl MetricDimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Pre-aggregated statistics for a sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStatistics {
    pub sample_count: f64,
    pub sum: f64,
    pub minimum: f64,
    pub maximum: f64,
}

/// Errors raised while shaping a metric payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("metric name cannot be empty")]
    EmptyName,

    #[error("metric value must be finite, got {0}")]
    NonFiniteValue(f64),

    #[error("counts refer to entries of the values array, but no values were given")]
    CountsWithoutValues,

    #[error("counts must have as many entries as values ({values} values, {counts} counts)")]
    CountsLengthMismatch { values: usize, counts: usize },

    #[error("unknown metric unit: {0}")]
    UnknownUnit(String),
}

/// A single metric data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDatum {
    pub name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub dimensions: Vec<MetricDimension>,

    /// Raw values observed during the period
    pub values: Vec<f64>,

    /// How many times each entry of `values` occurred
    pub counts: Vec<f64>,

    pub statistics: Option<MetricStatistics>,
    pub timestamp: DateTime<Utc>,
}

impl MetricDatum {
    /// Creates a datum stamped with the current time
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            unit: MetricUnit::None,
            dimensions: Vec::new(),
            values: Vec::new(),
            counts: Vec::new(),
            statistics: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_unit(mut self, unit: MetricUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push(MetricDimension::new(name, value));
        self
    }

    pub fn with_values(mut self, values: Vec<f64>, counts: Vec<f64>) -> Self {
        self.values = values;
        self.counts = counts;
        self
    }

    pub fn with_statistics(mut self, statistics: MetricStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Checks the payload before it is sent
    pub fn validate(&self) -> Result<(), MetricError> {
        if self.name.trim().is_empty() {
            return Err(MetricError::EmptyName);
        }

        if !self.value.is_finite() {
            return Err(MetricError::NonFiniteValue(self.value));
        }

        if !self.counts.is_empty() {
            if self.values.is_empty() {
                return Err(MetricError::CountsWithoutValues);
            }
            if self.counts.len() != self.values.len() {
                return Err(MetricError::CountsLengthMismatch {
                    values: self.values.len(),
                    counts: self.counts.len(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datum_defaults() {
        let datum = MetricDatum::new("MyCustomMetric", 1500.1337)
            .with_dimension("API_VERSION", "0.0.BETA");

        assert_eq!(datum.unit, MetricUnit::None);
        assert_eq!(datum.dimensions, vec![MetricDimension::new("API_VERSION", "0.0.BETA")]);
        assert!(datum.statistics.is_none());
        assert!(datum.validate().is_ok());
    }

    #[test]
    fn test_counts_require_values() {
        let datum = MetricDatum::new("latency", 1.0).with_values(vec![], vec![2.0]);
        assert_eq!(datum.validate(), Err(MetricError::CountsWithoutValues));
    }

    #[test]
    fn test_counts_length_must_match_values() {
        let datum = MetricDatum::new("latency", 1.0).with_values(vec![10.0, 20.0], vec![1.0]);
        assert_eq!(
            datum.validate(),
            Err(MetricError::CountsLengthMismatch {
                values: 2,
                counts: 1
            })
        );

        let datum = MetricDatum::new("latency", 1.0).with_values(vec![10.0, 20.0], vec![3.0, 1.0]);
        assert!(datum.validate().is_ok());
    }

    #[test]
    fn test_values_without_counts_are_fine() {
        let datum = MetricDatum::new("latency", 1.0).with_values(vec![10.0, 20.0], vec![]);
        assert!(datum.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_and_empty_name() {
        assert!(matches!(
            MetricDatum::new("x", f64::NAN).validate(),
            Err(MetricError::NonFiniteValue(_))
        ));
        assert_eq!(
            MetricDatum::new("x", f64::INFINITY).validate(),
            Err(MetricError::NonFiniteValue(f64::INFINITY))
        );
        assert_eq!(MetricDatum::new("  ", 1.0).validate(), Err(MetricError::EmptyName));
    }

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(MetricUnit::BitsPerSecond.as_str(), "Bits/Second");
        assert_eq!(MetricUnit::BytesPerSecond.as_str(), "Bytes/Second");
        assert_eq!(MetricUnit::CountPerSecond.to_string(), "Count/Second");
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("megabytes".parse::<MetricUnit>(), Ok(MetricUnit::Megabytes));
        assert_eq!("Count/Second".parse::<MetricUnit>(), Ok(MetricUnit::CountPerSecond));
        assert_eq!(
            "furlongs".parse::<MetricUnit>(),
            Err(MetricError::UnknownUnit("furlongs".to_string()))
        );

        for unit in MetricUnit::ALL {
            assert_eq!(unit.as_str().parse::<MetricUnit>(), Ok(unit));
        }
    }
}
