//! Taiwanese TTS configuration.

use crate::core::tts::base::{TTSConfig, TTSError, TTSResult};
use crate::utils::validate_endpoint_url;

/// Hugging Face inference endpoint for the Taigi TTS model
pub const TAIWANESE_TTS_URL: &str = "https://api-inference.huggingface.co/models/ylac/taigi-tts";

/// Resolved configuration for [`super::TaiwaneseTTS`]
#[derive(Debug, Clone)]
pub struct TaiwaneseTTSConfig {
    /// Base TTS configuration (carries the bearer token)
    pub base: TTSConfig,
    /// Inference endpoint URL
    pub endpoint: String,
}

impl TaiwaneseTTSConfig {
    /// Resolve defaults from a base [`TTSConfig`]
    pub fn from_base(base: TTSConfig) -> TTSResult<Self> {
        if base.api_key.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "Taiwanese TTS requires a Hugging Face API key".to_string(),
            ));
        }

        let endpoint = base
            .endpoint
            .clone()
            .unwrap_or_else(|| TAIWANESE_TTS_URL.to_string());
        validate_endpoint_url(&endpoint).map_err(|e| {
            TTSError::InvalidConfiguration(format!("Taiwanese TTS endpoint: {e}"))
        })?;

        Ok(Self { base, endpoint })
    }
}
