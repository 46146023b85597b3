use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_pi::primitives::DateTime as SdkDateTime;
use aws_sdk_pi::types::{DimensionGroup, MetricQuery, ServiceType};
use aws_sdk_pi::Client;
use chrono::{DateTime, Utc};

use crate::error::{PipelineError, Result};
use crate::models::{LoadQuery, MetricQueryResult, MetricSeries, SeriesPoint};
use crate::services::InsightsQuery;

/// Performance Insights query service backed by the `pi` API.
#[derive(Debug, Clone)]
pub struct PerformanceInsights {
    client: Client,
}

impl PerformanceInsights {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl InsightsQuery for PerformanceInsights {
    async fn query(
        &self,
        resource_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period_seconds: i32,
        queries: &[LoadQuery],
    ) -> Result<MetricQueryResult> {
        let mut metric_queries = Vec::with_capacity(queries.len());
        for q in queries {
            metric_queries.push(
                MetricQuery::builder()
                    .metric(&q.metric)
                    .group_by(DimensionGroup::builder().group(&q.group_by).build()?)
                    .build()?,
            );
        }

        let response = self
            .client
            .get_resource_metrics()
            .service_type(ServiceType::Rds)
            .identifier(resource_id)
            .start_time(SdkDateTime::from_millis(start.timestamp_millis()))
            .end_time(SdkDateTime::from_millis(end.timestamp_millis()))
            .period_in_seconds(period_seconds)
            .set_metric_queries(Some(metric_queries))
            .send()
            .await
            .map_err(|e| PipelineError::Query(e.to_string()))?;

        let mut metric_list = Vec::new();
        for entry in response.metric_list() {
            let Some(key) = entry.key() else {
                continue;
            };

            let mut data_points = Vec::new();
            for dp in entry.data_points() {
                let ts = dp.timestamp();
                let Some(timestamp) = DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
                else {
                    continue;
                };
                data_points.push(SeriesPoint {
                    timestamp,
                    value: Some(dp.value()),
                });
            }

            metric_list.push(MetricSeries {
                metric: key.metric().to_string(),
                dimensions: key.dimensions().cloned(),
                data_points,
            });
        }

        Ok(MetricQueryResult {
            identifier: response.identifier().unwrap_or_default().to_string(),
            metric_list,
        })
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_pi::types::DimensionGroup;

    use crate::error::PipelineError;

    #[test]
    fn query_build_errors_map_to_query_variant() {
        // A dimension group without its group name fails to build.
        let err = DimensionGroup::builder().build().unwrap_err();
        let err: PipelineError = err.into();
        assert!(matches!(err, PipelineError::Query(_)));
    }
}
