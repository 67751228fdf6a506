//! Core logic for the precis summarization service.
//!
//! This crate contains everything that is not an HTTP server surface: cleaning
//! HTML-embedded input down to plain text, deriving safe summary length bounds
//! from the input's word count, and invoking the remote summarization model
//! through a provider-agnostic trait. The design keeps the model itself opaque;
//! a degenerate input or a predictable model failure degrades to a fixed
//! sentinel string rather than an error, so callers always get a summary-shaped
//! answer when the pipeline is available.

pub mod cleaner;
pub mod errors;
pub mod length;
pub mod pipeline;

pub use cleaner::clean_html;
pub use errors::PipelineError;
pub use length::{Adjustment, LengthBounds};
pub use pipeline::{
    generate_summary, HttpPipeline, SummarizationPipeline, GENERATION_ERROR_SENTINEL,
    TOO_SHORT_SENTINEL,
};
