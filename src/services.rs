use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Instance, LoadQuery, MetricPoint, MetricQueryResult};

/// Lists the database fleet and per-instance tags.
#[async_trait]
pub trait Discovery: Send + Sync {
    async fn list_instances(&self) -> Result<Vec<Instance>>;

    async fn list_tags(&self, instance: &Instance) -> Result<HashMap<String, String>>;
}

/// Runs time-windowed metric queries against the Performance Insights
/// service for one resource.
#[async_trait]
pub trait InsightsQuery: Send + Sync {
    async fn query(
        &self,
        resource_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period_seconds: i32,
        queries: &[LoadQuery],
    ) -> Result<MetricQueryResult>;
}

/// Accepts one batch of flattened metric points under a namespace.
///
/// Callers must respect the ingestion service's batch limit; implementations
/// forward whatever they are given in a single call.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn put_batch(&self, namespace: &str, points: &[MetricPoint]) -> Result<()>;
}
