//! Republishes RDS Performance Insights load metrics into CloudWatch.
//!
//! One invocation selects the in-scope instances, queries their load series,
//! flattens them into namespaced metric points and publishes the points in
//! batches the ingestion API accepts.

pub mod aws;
pub mod config;
pub mod error;
pub mod fetch;
pub mod flatten;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod publish;
pub mod selector;
pub mod services;

pub use error::{PipelineError, Result};
pub use pipeline::Pipeline;
