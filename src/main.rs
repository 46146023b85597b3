use std::sync::Arc;

use tracing::{error, info};

use pi_metrics_publisher::aws::{CloudWatchSink, PerformanceInsights, RdsDiscovery};
use pi_metrics_publisher::config::Config;
use pi_metrics_publisher::pipeline::{run_outcome, Pipeline, RunSummary};
use pi_metrics_publisher::{logging, Result};

#[tokio::main]
async fn main() {
    logging::init_logger();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let result = run(&config).await;
    match &result {
        Ok(summary) => info!(
            instances_selected = summary.instances_selected,
            instances_published = summary.instances_published,
            points_published = summary.points_published,
            namespace = %config.namespace,
            "Republished Performance Insights metrics"
        ),
        Err(err) => error!(error = %err, "Pipeline run failed"),
    }

    // The trigger-facing outcome document goes to stdout.
    let outcome = run_outcome(&result);
    println!(
        "{}",
        serde_json::to_string(&outcome).expect("outcome serializes")
    );

    if result.is_err() {
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<RunSummary> {
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;

    let pipeline = Pipeline::new(
        Arc::new(RdsDiscovery::new(&sdk_config)),
        Arc::new(PerformanceInsights::new(&sdk_config)),
        Arc::new(CloudWatchSink::new(&sdk_config)),
    );

    pipeline
        .run(&config.namespace, config.tag_filter.as_deref())
        .await
}
