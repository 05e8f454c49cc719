use async_trait::async_trait;

use super::{SummarizeResult, Summarizer};
use crate::core::upload::LabelImage;

/// Fixed text returned for every image
pub const PLACEHOLDER_SUMMARY: &str = "這是一個模擬的商品標籤摘要，用於展示台語語音合成功能。";

/// Stand-in summarizer that ignores the image content
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSummarizer;

#[async_trait]
impl Summarizer for PlaceholderSummarizer {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn summarize(&self, _image: &LabelImage) -> SummarizeResult<String> {
        Ok(PLACEHOLDER_SUMMARY.to_string())
    }
}
