//! Shared TTS types: configuration, errors, audio clips and the provider trait.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::language::Language;

/// Default connect timeout for backend HTTP calls (seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default total request timeout for backend HTTP calls (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors produced by TTS providers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TTSError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Provider error (HTTP {status}): {message}")]
    ProviderError { status: u16, message: String },
    #[error("Synthesis timed out after {0:?}")]
    Timeout(Duration),
    #[error("Synthesis cancelled")]
    Cancelled,
    #[error("Audio generation failed: {0}")]
    AudioGenerationFailed(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TTSError {
    fn from(e: std::io::Error) -> Self {
        TTSError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for TTSError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TTSError::NetworkError(format!("Request timed out: {e}"))
        } else {
            TTSError::NetworkError(format!("Request failed: {e}"))
        }
    }
}

pub type TTSResult<T> = Result<T, TTSError>;

/// Encoded audio container produced by the providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
        }
    }

    /// MIME type for HTTP responses
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
        }
    }

    /// MIME type used inside the embedded `<audio>` element
    pub fn html_mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mp3",
        }
    }
}

/// One synthesized utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Encoded audio bytes
    pub data: Bytes,
    /// Container format of `data`
    pub format: AudioFormat,
    /// Language the clip was spoken in
    pub language: Language,
}

impl AudioClip {
    pub fn mp3(data: impl Into<Bytes>, language: Language) -> Self {
        Self {
            data: data.into(),
            format: AudioFormat::Mp3,
            language,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Configuration shared by every TTS provider
#[derive(Clone)]
pub struct TTSConfig {
    /// Provider identifier ("mandarin", "taiwanese")
    pub provider: String,
    /// Bearer token for providers that need one
    pub api_key: String,
    /// Endpoint URL override; providers fall back to their public endpoint
    pub endpoint: Option<String>,
    /// Language tag sent to the backend (e.g. "zh")
    pub language_tag: Option<String>,
    /// Connect timeout in seconds
    pub connection_timeout: Option<u64>,
    /// Total request timeout in seconds
    pub request_timeout: Option<u64>,
    /// Directory for intermediate audio files
    pub temp_dir: Option<PathBuf>,
}

impl Default for TTSConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            api_key: String::new(),
            endpoint: None,
            language_tag: None,
            connection_timeout: Some(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            temp_dir: None,
        }
    }
}

impl fmt::Debug for TTSConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TTSConfig")
            .field("provider", &self.provider)
            .field(
                "api_key",
                &if self.api_key.is_empty() {
                    "<empty>"
                } else {
                    "<redacted>"
                },
            )
            .field("endpoint", &self.endpoint)
            .field("language_tag", &self.language_tag)
            .field("connection_timeout", &self.connection_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}

impl TTSConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connection_timeout
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Build a reqwest client honouring the configured timeouts
    pub fn build_http_client(&self) -> TTSResult<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout())
            .timeout(self.request_timeout())
            .build()
            .map_err(|e| {
                TTSError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })
    }
}

/// Reject text the backends cannot speak
pub(crate) fn ensure_speakable(text: &str) -> TTSResult<()> {
    if text.trim().is_empty() {
        return Err(TTSError::InvalidInput("Text must not be empty".to_string()));
    }
    Ok(())
}

/// A text-to-speech backend that turns a full text into one audio clip
#[async_trait]
pub trait BaseTTS: Send + Sync {
    /// Short provider identifier
    fn provider_name(&self) -> &'static str;

    /// Language this provider speaks
    fn language(&self) -> Language;

    /// Synthesize `text` into a single clip
    async fn synthesize(&self, text: &str) -> TTSResult<AudioClip>;

    /// Static information about the provider for diagnostics
    fn get_provider_info(&self) -> serde_json::Value;
}

/// Boxed provider as stored in application state
pub type BoxedTTS = Box<dyn BaseTTS>;

/// Run a synthesis bounded by a deadline and a cancellation token.
///
/// Whichever finishes first wins; a cancelled or expired call drops the
/// in-flight request future.
pub async fn synthesize_with_deadline(
    tts: &dyn BaseTTS,
    text: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> TTSResult<AudioClip> {
    if cancel.is_cancelled() {
        return Err(TTSError::Cancelled);
    }

    tokio::select! {
        _ = cancel.cancelled() => {
            warn!(provider = tts.provider_name(), "Synthesis cancelled");
            Err(TTSError::Cancelled)
        }
        result = tokio::time::timeout(timeout, tts.synthesize(text)) => match result {
            Ok(inner) => inner,
            Err(_) => {
                warn!(provider = tts.provider_name(), ?timeout, "Synthesis timed out");
                Err(TTSError::Timeout(timeout))
            }
        },
    }
}
