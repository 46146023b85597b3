use std::env;

use crate::error::{PipelineError, Result};

/// Environment variable holding the target CloudWatch namespace.
pub const NAMESPACE_VAR: &str = "PI_NAMESPACE";
/// Environment variable holding the optional RDS tag filter expression.
pub const TAG_FILTER_VAR: &str = "RDS_FILTER_IN_TAGS";

/// Pipeline configuration, sourced from the environment once per invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace all republished metrics are grouped under.
    pub namespace: String,
    /// Tag filter expression, e.g. `env=dev,test;team=db`. Absent means
    /// every Performance Insights-enabled instance is in scope.
    pub tag_filter: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let namespace = env::var(NAMESPACE_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                PipelineError::Config(format!("{} must be set and non-empty", NAMESPACE_VAR))
            })?;

        let tag_filter = env::var(TAG_FILTER_VAR).ok().filter(|v| !v.is_empty());

        Ok(Self {
            namespace,
            tag_filter,
        })
    }
}
