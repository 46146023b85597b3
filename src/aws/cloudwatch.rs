use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudwatch::primitives::DateTime as SdkDateTime;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum};
use aws_sdk_cloudwatch::Client;

use crate::error::{PipelineError, Result};
use crate::models::MetricPoint;
use crate::services::MetricsSink;

/// Metric ingestion backed by CloudWatch `PutMetricData`.
#[derive(Debug, Clone)]
pub struct CloudWatchSink {
    client: Client,
}

impl CloudWatchSink {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

fn to_datum(point: &MetricPoint) -> MetricDatum {
    let mut datum = MetricDatum::builder()
        .metric_name(&point.metric_name)
        .timestamp(SdkDateTime::from_millis(point.timestamp.timestamp_millis()))
        .value(point.value);
    for dimension in &point.dimensions {
        datum = datum.dimensions(
            Dimension::builder()
                .name(&dimension.name)
                .value(&dimension.value)
                .build(),
        );
    }
    datum.build()
}

#[async_trait]
impl MetricsSink for CloudWatchSink {
    async fn put_batch(&self, namespace: &str, points: &[MetricPoint]) -> Result<()> {
        let metric_data = points.iter().map(to_datum).collect();

        self.client
            .put_metric_data()
            .namespace(namespace)
            .set_metric_data(Some(metric_data))
            .send()
            .await
            .map_err(|e| PipelineError::Ingest(e.to_string()))?;

        Ok(())
    }
}
