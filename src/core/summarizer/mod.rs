//! Label summarization.
//!
//! A [`Summarizer`] turns a decoded label image into a short natural-language
//! description that is then spoken aloud. Only a placeholder backend exists
//! today; OCR or vision-language backends implement the same trait and are
//! swapped in through [`crate::state::AppState`] without touching the pipeline.

mod placeholder;

pub use placeholder::{PLACEHOLDER_SUMMARY, PlaceholderSummarizer};

use async_trait::async_trait;

use crate::core::upload::LabelImage;

/// Errors raised by summarizer backends
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummarizeError {
    #[error("summarizer backend unavailable: {0}")]
    Unavailable(String),
    #[error("no label content found")]
    NoContent,
    #[error("summarization failed: {0}")]
    Failed(String),
}

pub type SummarizeResult<T> = Result<T, SummarizeError>;

/// Produces a description of a label image
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Backend identifier for logs and diagnostics
    fn name(&self) -> &str;

    /// Describe the label content of `image`
    async fn summarize(&self, image: &LabelImage) -> SummarizeResult<String>;
}
