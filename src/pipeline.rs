use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::services::{Discovery, InsightsQuery, MetricsSink};
use crate::{fetch, flatten, publish, selector};

/// What one invocation accomplished.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub instances_selected: usize,
    pub instances_published: usize,
    pub points_published: usize,
}

/// HTTP-style outcome reported to the invoking trigger.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub status_code: u16,
    pub body: String,
}

/// Maps a run result onto the trigger-facing outcome.
pub fn run_outcome(result: &Result<RunSummary>) -> RunOutcome {
    match result {
        Ok(_) => RunOutcome {
            status_code: 200,
            body: "ok".to_string(),
        },
        Err(err) => RunOutcome {
            status_code: 500,
            body: err.to_string(),
        },
    }
}

/// Drives one invocation end to end: select instances, then fetch, flatten
/// and publish each one in turn. Holds no state across instances or runs.
pub struct Pipeline {
    discovery: Arc<dyn Discovery>,
    insights: Arc<dyn InsightsQuery>,
    sink: Arc<dyn MetricsSink>,
}

impl Pipeline {
    pub fn new(
        discovery: Arc<dyn Discovery>,
        insights: Arc<dyn InsightsQuery>,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            discovery,
            insights,
            sink,
        }
    }

    /// Runs the pipeline once. Instances are processed in selection order;
    /// the first unrecoverable failure aborts the run.
    pub async fn run(&self, namespace: &str, filter_expr: Option<&str>) -> Result<RunSummary> {
        let instances = selector::select_instances(self.discovery.as_ref(), filter_expr).await?;
        info!(count = instances.len(), "Selected Performance Insights instances");

        let mut summary = RunSummary {
            instances_selected: instances.len(),
            ..Default::default()
        };

        for instance in &instances {
            let result = fetch::fetch_resource_metrics(self.insights.as_ref(), instance).await?;
            if result.metric_list.is_empty() {
                debug!(instance = %instance.name, "No metric series returned, skipping");
                continue;
            }

            let points = flatten::flatten(&result)?;
            let published = publish::publish(self.sink.as_ref(), namespace, &points).await?;

            info!(
                instance = %instance.name,
                points = published,
                "Republished instance metrics"
            );
            summary.instances_published += 1;
            summary.points_published += published;
        }

        Ok(summary)
    }
}
