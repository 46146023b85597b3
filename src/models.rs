use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Raw dimension key Performance Insights uses for wait-event grouping.
pub const WAIT_EVENT_KEY: &str = "db.wait_event.name";
/// Raw dimension key Performance Insights uses for tokenized-SQL grouping.
pub const SQL_STATEMENT_KEY: &str = "db.sql_tokenized.statement";

/// A monitored database instance, as reported by discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// DB instance identifier (human-facing name).
    pub name: String,
    /// Full resource ARN, used for tag lookups.
    pub arn: String,
    /// DBI resource identifier, the address the Performance Insights API
    /// understands. Distinct from the name and ARN.
    pub resource_id: String,
    /// Whether the Performance Insights feature is enabled on the instance.
    pub pi_enabled: bool,
}

/// One logical Performance Insights query: a metric aggregated over a
/// dimension group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadQuery {
    pub metric: String,
    pub group_by: String,
}

impl LoadQuery {
    pub fn new(metric: &str, group_by: &str) -> Self {
        Self {
            metric: metric.to_string(),
            group_by: group_by.to_string(),
        }
    }
}

/// A single point of a metric series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    /// Instances do not always report a value for every interval.
    pub value: Option<f64>,
}

/// One metric series from a query response: the metric name, the dimension
/// the series is grouped by (absent for the aggregate series), and its
/// ordered data points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSeries {
    pub metric: String,
    pub dimensions: Option<HashMap<String, String>>,
    pub data_points: Vec<SeriesPoint>,
}

/// Raw response for one instance's Performance Insights query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricQueryResult {
    /// DBI resource identifier the response is for.
    pub identifier: String,
    pub metric_list: Vec<MetricSeries>,
}

/// A metric dimension name/value pair in the shape the ingestion service
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDimension {
    pub name: String,
    pub value: String,
}

/// A fully flattened metric data point, ready for ingestion. Carries exactly
/// two dimensions: the instance scope and the series detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub metric_name: String,
    pub dimensions: [MetricDimension; 2],
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// The two dimension shapes Performance Insights load series come in.
///
/// Classification is closed on purpose: an unknown dimension key fails the
/// invocation instead of being silently mis-tagged into a known bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    WaitEvent,
    SqlStatement,
}

impl DimensionKind {
    /// Classifies a series dimension map by the raw key it carries.
    pub fn classify(dimensions: &HashMap<String, String>) -> Result<Self> {
        if dimensions.contains_key(WAIT_EVENT_KEY) {
            Ok(DimensionKind::WaitEvent)
        } else if dimensions.contains_key(SQL_STATEMENT_KEY) {
            Ok(DimensionKind::SqlStatement)
        } else {
            let mut keys: Vec<&str> = dimensions.keys().map(String::as_str).collect();
            keys.sort_unstable();
            Err(PipelineError::UnsupportedDimension(keys.join(",")))
        }
    }

    /// The raw dimension key this kind was classified from.
    pub fn raw_key(&self) -> &'static str {
        match self {
            DimensionKind::WaitEvent => WAIT_EVENT_KEY,
            DimensionKind::SqlStatement => SQL_STATEMENT_KEY,
        }
    }

    /// Name of the instance-scope dimension on published points.
    pub fn scope_dimension_name(&self) -> &'static str {
        match self {
            DimensionKind::WaitEvent => "db_waits",
            DimensionKind::SqlStatement => "db_sql",
        }
    }

    /// Name of the detail dimension on published points.
    pub fn detail_dimension_name(&self) -> &'static str {
        match self {
            DimensionKind::WaitEvent => "wait_event_name",
            DimensionKind::SqlStatement => "sql_statement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(key: &str) -> HashMap<String, String> {
        HashMap::from([(key.to_string(), "value".to_string())])
    }

    #[test]
    fn classify_known_keys() {
        assert_eq!(
            DimensionKind::classify(&dims(WAIT_EVENT_KEY)).unwrap(),
            DimensionKind::WaitEvent
        );
        assert_eq!(
            DimensionKind::classify(&dims(SQL_STATEMENT_KEY)).unwrap(),
            DimensionKind::SqlStatement
        );
    }

    #[test]
    fn classify_unknown_key_fails() {
        let err = DimensionKind::classify(&dims("db.host.name")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedDimension(_)));
        assert!(err.to_string().contains("db.host.name"));
    }
}
