use tracing::debug;

use crate::error::Result;
use crate::models::{DimensionKind, MetricDimension, MetricPoint, MetricQueryResult};

/// Flattens one query response into ingestion-ready points.
///
/// Each series contributes one point per data point that carries a value;
/// intervals without a value are dropped. Dimensionless series (the
/// ungrouped aggregate the service sometimes returns) contribute nothing.
/// A series grouped by a dimension this pipeline does not know fails the
/// whole invocation rather than publish mis-tagged data.
pub fn flatten(result: &MetricQueryResult) -> Result<Vec<MetricPoint>> {
    let mut points = Vec::new();

    for series in &result.metric_list {
        let Some(dimensions) = &series.dimensions else {
            debug!(metric = %series.metric, "Skipping dimensionless series");
            continue;
        };

        let kind = DimensionKind::classify(dimensions)?;
        let raw_value = dimensions.get(kind.raw_key()).map(String::as_str).unwrap_or_default();
        let scope = MetricDimension {
            name: kind.scope_dimension_name().to_string(),
            value: result.identifier.clone(),
        };
        let detail = MetricDimension {
            name: kind.detail_dimension_name().to_string(),
            // Colons collide with CloudWatch naming downstream.
            value: raw_value.replace(':', "."),
        };

        for data_point in &series.data_points {
            let Some(value) = data_point.value else {
                continue;
            };
            points.push(MetricPoint {
                metric_name: series.metric.clone(),
                dimensions: [scope.clone(), detail.clone()],
                timestamp: data_point.timestamp,
                value,
            });
        }
    }

    Ok(points)
}
