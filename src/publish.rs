use tracing::debug;

use crate::error::Result;
use crate::models::MetricPoint;
use crate::services::MetricsSink;

/// Hard per-request limit of the ingestion service.
pub const MAX_BATCH_SIZE: usize = 20;

/// Publishes points in consecutive batches of at most [`MAX_BATCH_SIZE`],
/// preserving input order. No points means no ingestion call. A failed batch
/// aborts the remaining ones and propagates.
///
/// Returns the number of points published.
pub async fn publish(
    sink: &dyn MetricsSink,
    namespace: &str,
    points: &[MetricPoint],
) -> Result<usize> {
    if points.is_empty() {
        return Ok(0);
    }

    for batch in points.chunks(MAX_BATCH_SIZE) {
        debug!(namespace, batch_size = batch.len(), "Publishing metric batch");
        sink.put_batch(namespace, batch).await?;
    }

    Ok(points.len())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::PipelineError;
    use crate::models::MetricDimension;

    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Vec<MetricPoint>>>,
        fail_on_batch: Option<usize>,
    }

    #[async_trait]
    impl MetricsSink for RecordingSink {
        async fn put_batch(&self, _namespace: &str, points: &[MetricPoint]) -> Result<()> {
            let mut batches = self.batches.lock().unwrap();
            if self.fail_on_batch == Some(batches.len()) {
                return Err(PipelineError::Ingest("throttled".to_string()));
            }
            batches.push(points.to_vec());
            Ok(())
        }
    }

    fn points(n: usize) -> Vec<MetricPoint> {
        (0..n)
            .map(|i| MetricPoint {
                metric_name: "db.load.avg".to_string(),
                dimensions: [
                    MetricDimension {
                        name: "db_waits".to_string(),
                        value: "db-A".to_string(),
                    },
                    MetricDimension {
                        name: "wait_event_name".to_string(),
                        value: "CPU".to_string(),
                    },
                ],
                timestamp: Utc::now(),
                value: i as f64,
            })
            .collect()
    }

    #[tokio::test]
    async fn batches_of_at_most_twenty_in_order() {
        let sink = RecordingSink::default();
        let input = points(45);

        let published = publish(&sink, "TestNs", &input).await.unwrap();
        assert_eq!(published, 45);

        let batches = sink.batches.lock().unwrap();
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![20, 20, 5]);

        let flattened: Vec<f64> = batches.iter().flatten().map(|p| p.value).collect();
        let expected: Vec<f64> = (0..45).map(|i| i as f64).collect();
        assert_eq!(flattened, expected);
    }

    #[tokio::test]
    async fn empty_input_makes_no_call() {
        let sink = RecordingSink::default();
        let published = publish(&sink, "TestNs", &[]).await.unwrap();
        assert_eq!(published, 0);
        assert!(sink.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_batch_stops_remaining_batches() {
        let sink = RecordingSink {
            fail_on_batch: Some(1),
            ..Default::default()
        };

        let err = publish(&sink, "TestNs", &points(45)).await.unwrap_err();
        assert!(matches!(err, PipelineError::Ingest(_)));
        assert_eq!(sink.batches.lock().unwrap().len(), 1);
    }
}
