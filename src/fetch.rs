use chrono::{Duration, Utc};
use tracing::debug;

use crate::error::Result;
use crate::models::{Instance, LoadQuery, MetricQueryResult};
use crate::services::InsightsQuery;

/// Metric queried for every instance.
pub const LOAD_METRIC: &str = "db.load.avg";
/// Seconds of history fetched per invocation.
pub const LOOKBACK_SECONDS: i64 = 300;
/// Granularity of the fetched series.
pub const PERIOD_SECONDS: i32 = 60;

/// Fetches one instance's load series: average load grouped by wait event
/// and by tokenized SQL statement, over the trailing five minutes.
pub async fn fetch_resource_metrics(
    insights: &dyn InsightsQuery,
    instance: &Instance,
) -> Result<MetricQueryResult> {
    let end = Utc::now();
    let start = end - Duration::seconds(LOOKBACK_SECONDS);
    let queries = [
        LoadQuery::new(LOAD_METRIC, "db.wait_event"),
        LoadQuery::new(LOAD_METRIC, "db.sql_tokenized"),
    ];

    debug!(
        instance = %instance.name,
        resource_id = %instance.resource_id,
        "Fetching Performance Insights metrics"
    );
    insights
        .query(&instance.resource_id, start, end, PERIOD_SECONDS, &queries)
        .await
}
