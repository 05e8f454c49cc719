//! Mandarin TTS configuration.

use std::path::PathBuf;

use crate::core::tts::base::{TTSConfig, TTSError, TTSResult};
use crate::utils::validate_endpoint_url;

/// Public Google Translate speech endpoint
pub const MANDARIN_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Language tag used when none is configured
pub const DEFAULT_LANGUAGE_TAG: &str = "zh";

/// Longest text the endpoint accepts in one request, in characters
pub const MAX_CHUNK_CHARS: usize = 100;

/// Resolved configuration for [`super::MandarinTTS`]
#[derive(Debug, Clone)]
pub struct MandarinTTSConfig {
    /// Base TTS configuration
    pub base: TTSConfig,
    /// Endpoint URL
    pub endpoint: String,
    /// `tl` parameter sent to the endpoint
    pub language_tag: String,
    /// Directory where the intermediate mp3 is written
    pub temp_dir: PathBuf,
    /// Chunk size limit in characters
    pub max_chunk_chars: usize,
}

impl MandarinTTSConfig {
    /// Resolve defaults from a base [`TTSConfig`]
    pub fn from_base(base: TTSConfig) -> TTSResult<Self> {
        let endpoint = base
            .endpoint
            .clone()
            .unwrap_or_else(|| MANDARIN_TTS_URL.to_string());
        validate_endpoint_url(&endpoint).map_err(|e| {
            TTSError::InvalidConfiguration(format!("Mandarin TTS endpoint: {e}"))
        })?;

        let language_tag = base
            .language_tag
            .clone()
            .filter(|tag| !tag.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE_TAG.to_string());

        let temp_dir = base.temp_dir.clone().unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            base,
            endpoint,
            language_tag,
            temp_dir,
            max_chunk_chars: MAX_CHUNK_CHARS,
        })
    }
}
