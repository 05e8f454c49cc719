mod base;
pub mod mandarin;
pub mod taiwanese;

pub use base::{
    AudioClip, AudioFormat, BaseTTS, BoxedTTS, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, TTSConfig, TTSError, TTSResult, synthesize_with_deadline,
};
pub use mandarin::{MANDARIN_TTS_URL, MandarinTTS, chunk_text};
pub use taiwanese::{TAIWANESE_TTS_URL, TaiwaneseTTS};

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::language::Language;

/// Factory function to create the TTS provider for a language.
///
/// # Supported Languages
///
/// - [`Language::Chinese`] - Mandarin via the Google Translate speech endpoint
/// - [`Language::Taiwanese`] - Taigi via a Hugging Face inference endpoint
///
/// # Example
///
/// ```rust,ignore
/// use label_reader::core::{Language, tts::{create_tts_provider, TTSConfig}};
///
/// let config = TTSConfig {
///     api_key: "hf_...".to_string(),
///     ..Default::default()
/// };
///
/// let provider = create_tts_provider(Language::Taiwanese, config)?;
/// ```
pub fn create_tts_provider(language: Language, config: TTSConfig) -> TTSResult<BoxedTTS> {
    match language {
        Language::Chinese => Ok(Box::new(MandarinTTS::new(config)?)),
        Language::Taiwanese => Ok(Box::new(TaiwaneseTTS::new(config)?)),
    }
}

/// Returns a map of provider names to their default API endpoint URLs.
pub fn get_tts_provider_urls() -> HashMap<String, String> {
    let mut urls = HashMap::new();
    urls.insert("mandarin".to_string(), MANDARIN_TTS_URL.to_string());
    urls.insert("taiwanese".to_string(), TAIWANESE_TTS_URL.to_string());
    urls
}

/// One provider per selectable language
///
/// Routing is total: every [`Language`] maps to exactly one provider.
#[derive(Clone)]
pub struct TtsRouter {
    mandarin: Arc<dyn BaseTTS>,
    taiwanese: Arc<dyn BaseTTS>,
}

impl TtsRouter {
    pub fn new(mandarin: Arc<dyn BaseTTS>, taiwanese: Arc<dyn BaseTTS>) -> Self {
        Self {
            mandarin,
            taiwanese,
        }
    }

    /// Build both providers from their configurations
    pub fn from_configs(mandarin: TTSConfig, taiwanese: TTSConfig) -> TTSResult<Self> {
        Ok(Self::new(
            Arc::from(create_tts_provider(Language::Chinese, mandarin)?),
            Arc::from(create_tts_provider(Language::Taiwanese, taiwanese)?),
        ))
    }

    /// Provider for the selected language
    pub fn route(&self, language: Language) -> &dyn BaseTTS {
        match language {
            Language::Chinese => self.mandarin.as_ref(),
            Language::Taiwanese => self.taiwanese.as_ref(),
        }
    }

    /// Provider info for every language, keyed by language id
    pub fn providers_info(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for language in Language::ALL {
            map.insert(
                language.as_str().to_string(),
                self.route(language).get_provider_info(),
            );
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taiwanese_config() -> TTSConfig {
        TTSConfig {
            provider: "taiwanese".to_string(),
            api_key: "hf_test".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_tts_provider() {
        let mandarin = create_tts_provider(Language::Chinese, TTSConfig::default()).unwrap();
        assert_eq!(mandarin.provider_name(), "mandarin");

        let taiwanese = create_tts_provider(Language::Taiwanese, taiwanese_config()).unwrap();
        assert_eq!(taiwanese.provider_name(), "taiwanese");
    }

    #[tokio::test]
    async fn test_create_taiwanese_without_key_fails() {
        let result = create_tts_provider(Language::Taiwanese, TTSConfig::default());
        assert!(matches!(result, Err(TTSError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_get_tts_provider_urls() {
        let urls = get_tts_provider_urls();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls.get("mandarin").unwrap(), MANDARIN_TTS_URL);
        assert_eq!(urls.get("taiwanese").unwrap(), TAIWANESE_TTS_URL);
    }

    #[tokio::test]
    async fn test_router_is_total_and_exclusive() {
        let router = TtsRouter::from_configs(TTSConfig::default(), taiwanese_config()).unwrap();

        for language in Language::ALL {
            assert_eq!(router.route(language).language(), language);
        }
        assert_ne!(
            router.route(Language::Chinese).provider_name(),
            router.route(Language::Taiwanese).provider_name()
        );
    }

    #[tokio::test]
    async fn test_router_providers_info() {
        let router = TtsRouter::from_configs(TTSConfig::default(), taiwanese_config()).unwrap();
        let info = router.providers_info();
        assert_eq!(info["chinese"]["provider"], "mandarin");
        assert_eq!(info["taiwanese"]["provider"], "taiwanese");
    }
}
