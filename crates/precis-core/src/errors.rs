//! Error types for the summarization pipeline.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// The service started without a model endpoint; treated as a hard
    /// failure by callers rather than degraded to a sentinel summary.
    #[error("Summarization pipeline is not initialized")]
    NotInitialized,
    #[error("Model invocation failed: {0}")]
    Model(String),
    #[error("HTTP transport error: {0}")]
    Http(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::Http(err.to_string())
    }
}
