use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported metric dimension: {0}")]
    UnsupportedDimension(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Performance Insights query error: {0}")]
    Query(String),

    #[error("Metric ingestion error: {0}")]
    Ingest(String),
}

impl From<aws_sdk_pi::error::BuildError> for PipelineError {
    fn from(err: aws_sdk_pi::error::BuildError) -> Self {
        PipelineError::Query(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
