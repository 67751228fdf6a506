//! Summarization model abstractions and invocation.
//!
//! Defines the core pipeline trait and the HTTP-backed implementation for
//! remote model endpoints. [`generate_summary`] is the single entry point used
//! by request handlers: it derives length bounds, invokes the model once, and
//! converts predictable model failures into fixed sentinel strings so the
//! caller always receives a summary-shaped answer. Only the
//! "pipeline not initialized" case propagates as a hard error.

use crate::errors::PipelineError;
use crate::length::{self, Adjustment, LengthBounds};
use async_trait::async_trait;

pub mod http;

pub use http::HttpPipeline;

/// Sentinel returned for inputs below the summarizable word count.
pub const TOO_SHORT_SENTINEL: &str =
    "Input text is too short to generate a meaningful summary.";

/// Sentinel returned when the model fails for a reason other than input length.
pub const GENERATION_ERROR_SENTINEL: &str = "Error generating summary.";

/// An opaque pretrained summarization model.
#[async_trait]
pub trait SummarizationPipeline: Send + Sync {
    /// Performs one summarization call with explicit length bounds.
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
        do_sample: bool,
    ) -> Result<String, PipelineError>;
}

/// Whether an error message indicates the model rejected the call because the
/// input was shorter than the requested output lengths.
///
/// Matching on the model library's wording is fragile but preserved for
/// compatibility with existing clients that key on the returned sentinel text.
fn is_sequence_length_error(message: &str) -> bool {
    message.contains("is too short") || message.contains("must be <= sequence_length")
}

/// Summarizes `text` through `pipeline`, degrading predictable failures to
/// sentinel strings.
///
/// Inputs below [`length::MIN_SUMMARIZABLE_WORDS`] words return
/// [`TOO_SHORT_SENTINEL`] without a model call. Model failures return either a
/// length-specific sentinel carrying the input's word count or
/// [`GENERATION_ERROR_SENTINEL`]. [`PipelineError::NotInitialized`] is the one
/// error this function propagates.
pub async fn generate_summary(
    pipeline: &dyn SummarizationPipeline,
    text: &str,
    do_sample: bool,
) -> Result<String, PipelineError> {
    let words = length::word_count(text);

    let bounds = match length::adjust_bounds(words, LengthBounds::default()) {
        Adjustment::TooShort => return Ok(TOO_SHORT_SENTINEL.to_string()),
        Adjustment::Bounds(bounds) => bounds,
    };

    log::debug!(
        "Summarizing {} words with bounds [{}, {}]",
        words,
        bounds.min_length,
        bounds.max_length
    );

    match pipeline
        .summarize(text, bounds.min_length, bounds.max_length, do_sample)
        .await
    {
        Ok(summary) => Ok(summary),
        Err(PipelineError::NotInitialized) => Err(PipelineError::NotInitialized),
        Err(err) => {
            log::warn!("Summarization call failed: {}", err);
            if is_sequence_length_error(&err.to_string()) {
                Ok(format!(
                    "The input text ({} words) is too short for the summarization model.",
                    words
                ))
            } else {
                Ok(GENERATION_ERROR_SENTINEL.to_string())
            }
        }
    }
}
