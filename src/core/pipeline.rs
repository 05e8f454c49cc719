//! Per-image orchestration: decode, summarize, speak.
//!
//! Images are processed one after another in upload order. Every image yields
//! exactly one [`ImageOutcome`]; a failure in one image never stops the
//! images after it.

use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span, warn};

use crate::core::language::Language;
use crate::core::summarizer::{SummarizeError, Summarizer};
use crate::core::tts::{
    AudioClip, DEFAULT_REQUEST_TIMEOUT_SECS, TTSError, TtsRouter, synthesize_with_deadline,
};
use crate::core::upload::{ImageError, UploadedImage};

/// Informational note shown for each image when advanced mode is on
pub const ADVANCED_MODE_NOTE: &str = "🔍 進階模式：可提供更多圖像細節與建議（尚未實作）";

/// Message shown in place of the audio player when synthesis fails
pub fn tts_failure_message(err: &TTSError) -> String {
    format!("語音合成失敗：{err}")
}

/// Message shown in place of an image's results when processing fails
pub fn image_failure_message(index: usize, err: &dyn std::fmt::Display) -> String {
    format!("處理圖片 {index} 時發生錯誤：{err}")
}

/// Settings applied to one processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub language: Language,
    pub advanced_mode: bool,
    /// Upper bound for one synthesis call
    pub tts_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            advanced_mode: false,
            tts_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Result of the speech step for one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
    Ready(AudioClip),
    Failed { message: String },
}

impl AudioOutcome {
    pub fn clip(&self) -> Option<&AudioClip> {
        match self {
            AudioOutcome::Ready(clip) => Some(clip),
            AudioOutcome::Failed { .. } => None,
        }
    }
}

/// Everything rendered for a successfully processed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReport {
    /// `data:` URI of the original upload
    pub preview: String,
    pub width: u32,
    pub height: u32,
    pub summary: String,
    pub audio: AudioOutcome,
    pub advanced_note: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResult {
    Processed(ImageReport),
    Failed { message: String },
}

/// Outcome for the image at `index` (1-based, upload order)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOutcome {
    pub index: usize,
    pub filename: String,
    pub result: ImageResult,
}

impl ImageOutcome {
    /// Caption under the preview
    pub fn caption(&self) -> String {
        format!("圖片 {}", self.index)
    }

    /// Heading above the audio player
    pub fn audio_label(&self) -> String {
        format!("圖片 {} 語音", self.index)
    }

    pub fn report(&self) -> Option<&ImageReport> {
        match &self.result {
            ImageResult::Processed(report) => Some(report),
            ImageResult::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.result, ImageResult::Failed { .. })
    }
}

/// Serializable view of an outcome for the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub index: usize,
    pub filename: String,
    pub caption: String,
    pub summary: Option<String>,
    pub audio_mime_type: Option<&'static str>,
    pub audio_base64: Option<String>,
    pub audio_error: Option<String>,
    pub advanced_note: Option<&'static str>,
    pub error: Option<String>,
}

impl From<&ImageOutcome> for OutcomeSummary {
    fn from(outcome: &ImageOutcome) -> Self {
        use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

        let mut summary = OutcomeSummary {
            index: outcome.index,
            filename: outcome.filename.clone(),
            caption: outcome.caption(),
            summary: None,
            audio_mime_type: None,
            audio_base64: None,
            audio_error: None,
            advanced_note: None,
            error: None,
        };

        match &outcome.result {
            ImageResult::Processed(report) => {
                summary.summary = Some(report.summary.clone());
                summary.advanced_note = report.advanced_note;
                match &report.audio {
                    AudioOutcome::Ready(clip) => {
                        summary.audio_mime_type = Some(clip.format.mime_type());
                        summary.audio_base64 = Some(BASE64.encode(&clip.data));
                    }
                    AudioOutcome::Failed { message } => {
                        summary.audio_error = Some(message.clone());
                    }
                }
            }
            ImageResult::Failed { message } => summary.error = Some(message.clone()),
        }

        summary
    }
}

#[derive(Debug, thiserror::Error)]
enum StepError {
    #[error("{0}")]
    Image(#[from] ImageError),
    #[error("{0}")]
    Summarize(#[from] SummarizeError),
    #[error("image decoding task failed: {0}")]
    Join(String),
    #[error("processing cancelled")]
    Cancelled,
}

async fn process_one(
    upload: &UploadedImage,
    options: &PipelineOptions,
    summarizer: &dyn Summarizer,
    tts: &TtsRouter,
    cancel: &CancellationToken,
) -> Result<ImageReport, StepError> {
    if cancel.is_cancelled() {
        return Err(StepError::Cancelled);
    }

    let to_decode = upload.clone();
    let label = tokio::task::spawn_blocking(move || to_decode.decode())
        .await
        .map_err(|e| StepError::Join(e.to_string()))??;

    debug!(
        width = label.width,
        height = label.height,
        format = ?label.format,
        "Image decoded"
    );

    let summary = summarizer.summarize(&label).await?;

    let provider = tts.route(options.language);
    let audio = match synthesize_with_deadline(provider, &summary, options.tts_timeout, cancel)
        .await
    {
        Ok(clip) => AudioOutcome::Ready(clip),
        Err(e) => {
            warn!(provider = provider.provider_name(), error = %e, "Speech synthesis failed");
            AudioOutcome::Failed {
                message: tts_failure_message(&e),
            }
        }
    };

    Ok(ImageReport {
        preview: upload.preview_data_uri(),
        width: label.width,
        height: label.height,
        summary,
        audio,
        advanced_note: options.advanced_mode.then_some(ADVANCED_MODE_NOTE),
    })
}

/// Process every upload and return one outcome per image, in order
pub async fn process_uploads(
    uploads: &[UploadedImage],
    options: &PipelineOptions,
    summarizer: &dyn Summarizer,
    tts: &TtsRouter,
    cancel: &CancellationToken,
) -> Vec<ImageOutcome> {
    let mut outcomes = Vec::with_capacity(uploads.len());

    for (i, upload) in uploads.iter().enumerate() {
        let index = i + 1;
        let span = info_span!(
            "process_image",
            index,
            filename = %upload.filename,
            language = %options.language
        );

        let result = process_one(upload, options, summarizer, tts, cancel)
            .instrument(span)
            .await;

        let result = match result {
            Ok(report) => ImageResult::Processed(report),
            Err(e) => {
                warn!(index, filename = %upload.filename, error = %e, "Image processing failed");
                ImageResult::Failed {
                    message: image_failure_message(index, &e),
                }
            }
        };

        outcomes.push(ImageOutcome {
            index,
            filename: upload.filename.clone(),
            result,
        });
    }

    outcomes
}
