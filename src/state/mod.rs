//! Shared application state.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::session::SessionStore;
use crate::core::summarizer::{PlaceholderSummarizer, Summarizer};
use crate::core::tts::{TTSResult, TtsRouter};

/// State shared by every request handler
pub struct AppState {
    pub config: ServerConfig,
    pub summarizer: Arc<dyn Summarizer>,
    pub tts: TtsRouter,
    pub sessions: SessionStore,
    /// Cancelled on shutdown; in-flight pipelines run on child tokens
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build state with the configured speech backends and the placeholder summarizer
    pub fn new(config: ServerConfig) -> TTSResult<Arc<Self>> {
        let tts = TtsRouter::from_configs(config.mandarin_tts_config(), config.taiwanese_tts_config())?;

        info!(
            mandarin = %config.mandarin_tts_url,
            taiwanese = %config.taiwanese_tts_url,
            "Speech backends configured"
        );

        Ok(Self::with_components(
            config,
            Arc::new(PlaceholderSummarizer),
            tts,
        ))
    }

    /// Build state from explicit components
    pub fn with_components(
        config: ServerConfig,
        summarizer: Arc<dyn Summarizer>,
        tts: TtsRouter,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            summarizer,
            tts,
            sessions: SessionStore::new(),
            shutdown: CancellationToken::new(),
        })
    }

    /// Token for one unit of work, cancelled with the server
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_builds_both_providers() {
        let state = AppState::new(ServerConfig::with_api_key("hf_test")).unwrap();
        let info = state.tts.providers_info();
        assert_eq!(info["chinese"]["provider"], "mandarin");
        assert_eq!(info["taiwanese"]["provider"], "taiwanese");
        assert_eq!(state.summarizer.name(), "placeholder");
    }

    #[tokio::test]
    async fn test_new_rejects_blank_key() {
        let result = AppState::new(ServerConfig::with_api_key("   "));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_request_token_follows_shutdown() {
        let state = AppState::new(ServerConfig::with_api_key("hf_test")).unwrap();
        let token = state.request_token();
        assert!(!token.is_cancelled());
        state.shutdown.cancel();
        assert!(token.is_cancelled());
    }
}
