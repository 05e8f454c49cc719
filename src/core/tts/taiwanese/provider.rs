//! Taiwanese TTS provider implementation.
//!
//! # API Reference
//!
//! - Endpoint: `POST https://api-inference.huggingface.co/models/ylac/taigi-tts`
//! - Auth: `Authorization: Bearer <key>`
//! - Body: `{"inputs": "<text>"}`
//! - Output: raw audio bytes in the response body
//! - Errors: JSON `{"error": "..."}` with a non-2xx status

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::TaiwaneseTTSConfig;
use crate::core::language::Language;
use crate::core::tts::base::{
    AudioClip, BaseTTS, TTSConfig, TTSError, TTSResult, ensure_speakable,
};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

/// Extract a readable message from an error response body
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<InferenceError>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(200).collect()
}

/// Taiwanese TTS provider backed by a Hugging Face inference endpoint
///
/// The response body is returned as-is; nothing is buffered to disk.
pub struct TaiwaneseTTS {
    config: TaiwaneseTTSConfig,
    http_client: reqwest::Client,
}

impl TaiwaneseTTS {
    /// Create a new Taiwanese TTS instance
    pub fn new(config: TTSConfig) -> TTSResult<Self> {
        let config = TaiwaneseTTSConfig::from_base(config)?;
        let http_client = config.base.build_http_client()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Resolved provider configuration
    pub fn config(&self) -> &TaiwaneseTTSConfig {
        &self.config
    }

    /// Build the inference request
    fn build_http_request(&self, text: &str) -> reqwest::RequestBuilder {
        self.http_client
            .post(&self.config.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.base.api_key),
            )
            .header("Content-Type", "application/json")
            .json(&InferenceRequest { inputs: text })
    }
}

#[async_trait]
impl BaseTTS for TaiwaneseTTS {
    fn provider_name(&self) -> &'static str {
        "taiwanese"
    }

    fn language(&self) -> Language {
        Language::Taiwanese
    }

    async fn synthesize(&self, text: &str) -> TTSResult<AudioClip> {
        ensure_speakable(text)?;

        debug!(
            text_len = text.len(),
            endpoint = %self.config.endpoint,
            "Taiwanese TTS synthesis request"
        );

        let response = self.build_http_request(text).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TTSError::ProviderError {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let data = response.bytes().await?;
        if data.is_empty() {
            return Err(TTSError::AudioGenerationFailed(
                "Taiwanese TTS returned an empty body".to_string(),
            ));
        }

        info!(audio_bytes = data.len(), "Taiwanese TTS synthesis complete");

        Ok(AudioClip::mp3(data, Language::Taiwanese))
    }

    fn get_provider_info(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": "taiwanese",
            "language": Language::Taiwanese.as_str(),
            "api_type": "HTTP REST",
            "endpoint": self.config.endpoint,
            "auth": "bearer",
            "output_format": "mp3",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json() {
        let body = r#"{"error":"Model ylac/taigi-tts is currently loading","estimated_time":20.0}"#;
        assert_eq!(
            error_message(body),
            "Model ylac/taigi-tts is currently loading"
        );
    }

    #[test]
    fn test_error_message_from_text() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "empty response body");
    }

    #[test]
    fn test_error_message_truncated() {
        let body = "x".repeat(500);
        assert_eq!(error_message(&body).len(), 200);
    }

    #[test]
    fn test_request_shape() {
        let tts = TaiwaneseTTS::new(TTSConfig {
            api_key: "hf_test".to_string(),
            ..Default::default()
        })
        .unwrap();
        let request = tts.build_http_request("你好").build().unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), super::super::TAIWANESE_TTS_URL);
        assert_eq!(request.headers()["Authorization"], "Bearer hf_test");
        assert_eq!(request.headers()["Content-Type"], "application/json");

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(json, serde_json::json!({ "inputs": "你好" }));
    }
}
