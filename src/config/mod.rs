//! Configuration module for the label reader server
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable access
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use label_reader::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub mod env;
mod merge;
mod validation;
mod yaml;

pub use merge::{
    DEFAULT_HOST, DEFAULT_MAX_IMAGES_PER_UPLOAD, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
    DEFAULT_SESSION_TTL_SECONDS,
};
pub use yaml::YamlConfig;

use crate::core::tts::mandarin::DEFAULT_LANGUAGE_TAG;
use crate::core::tts::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, MANDARIN_TTS_URL,
    TAIWANESE_TTS_URL, TTSConfig,
};

/// Server configuration
///
/// Contains all configuration needed to run the label reader, including:
/// - Server settings (host, port)
/// - Speech backend credentials and endpoints
/// - Synthesis timeouts and the scratch directory
/// - Upload and session limits
/// - CORS origins
#[derive(Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Speech backends
    /// Bearer token for the Taiwanese inference endpoint (required)
    pub huggingface_api_key: String,
    pub taiwanese_tts_url: String,
    pub mandarin_tts_url: String,
    /// Language tag sent to the Mandarin endpoint
    pub mandarin_language: String,

    // Synthesis
    pub tts_connect_timeout_seconds: u64,
    /// Bounds each HTTP request and each full synthesis call
    pub tts_request_timeout_seconds: u64,
    /// Where the Mandarin adapter writes its short-lived mp3 files
    pub audio_temp_dir: PathBuf,

    // Limits
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    pub max_images_per_upload: usize,
    /// Idle time after which a session is dropped
    pub session_ttl_seconds: u64,

    // Security
    /// Comma-separated list of allowed origins, "*" for any.
    /// None means same-origin only.
    pub cors_allowed_origins: Option<String>,
}

/// Zeroize the API key when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.huggingface_api_key.zeroize();
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("huggingface_api_key", &"<redacted>")
            .field("taiwanese_tts_url", &self.taiwanese_tts_url)
            .field("mandarin_tts_url", &self.mandarin_tts_url)
            .field("mandarin_language", &self.mandarin_language)
            .field(
                "tts_connect_timeout_seconds",
                &self.tts_connect_timeout_seconds,
            )
            .field(
                "tts_request_timeout_seconds",
                &self.tts_request_timeout_seconds,
            )
            .field("audio_temp_dir", &self.audio_temp_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("max_images_per_upload", &self.max_images_per_upload)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl ServerConfig {
    /// Default configuration around a given API key
    ///
    /// Useful for embedding and tests; production code loads through
    /// [`ServerConfig::from_env`] or [`ServerConfig::from_file`].
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            huggingface_api_key: api_key.into(),
            taiwanese_tts_url: TAIWANESE_TTS_URL.to_string(),
            mandarin_tts_url: MANDARIN_TTS_URL.to_string(),
            mandarin_language: DEFAULT_LANGUAGE_TAG.to_string(),
            tts_connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECS,
            tts_request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            audio_temp_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_images_per_upload: DEFAULT_MAX_IMAGES_PER_UPLOAD,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cors_allowed_origins: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// `.env` is loaded in `main` before this is called, so its values are
    /// visible here; real environment variables win over `.env`.
    ///
    /// # Errors
    /// Returns an error if `HUGGINGFACE_API_KEY` is missing, a numeric
    /// variable is malformed, or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - The API key is missing
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Upper bound for one synthesis call
    pub fn tts_timeout(&self) -> Duration {
        Duration::from_secs(self.tts_request_timeout_seconds)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }

    fn base_tts_config(&self, provider: &str) -> TTSConfig {
        TTSConfig {
            provider: provider.to_string(),
            connection_timeout: Some(self.tts_connect_timeout_seconds),
            request_timeout: Some(self.tts_request_timeout_seconds),
            ..Default::default()
        }
    }

    /// Provider configuration for the Mandarin adapter
    pub fn mandarin_tts_config(&self) -> TTSConfig {
        TTSConfig {
            endpoint: Some(self.mandarin_tts_url.clone()),
            language_tag: Some(self.mandarin_language.clone()),
            temp_dir: Some(self.audio_temp_dir.clone()),
            ..self.base_tts_config("mandarin")
        }
    }

    /// Provider configuration for the Taiwanese adapter
    pub fn taiwanese_tts_config(&self) -> TTSConfig {
        TTSConfig {
            api_key: self.huggingface_api_key.clone(),
            endpoint: Some(self.taiwanese_tts_url.clone()),
            ..self.base_tts_config("taiwanese")
        }
    }

    /// Human-readable settings with secrets masked, for `check-config`
    pub fn redacted_summary(&self) -> String {
        let key = mask_secret(&self.huggingface_api_key);
        let cors = self
            .cors_allowed_origins
            .as_deref()
            .unwrap_or("(same-origin only)");
        format!(
            "address: {}\n\
             huggingface_api_key: {key}\n\
             taiwanese_tts_url: {}\n\
             mandarin_tts_url: {}\n\
             mandarin_language: {}\n\
             tts_connect_timeout_seconds: {}\n\
             tts_request_timeout_seconds: {}\n\
             audio_temp_dir: {}\n\
             max_upload_bytes: {}\n\
             max_images_per_upload: {}\n\
             session_ttl_seconds: {}\n\
             cors_allowed_origins: {cors}",
            self.address(),
            self.taiwanese_tts_url,
            self.mandarin_tts_url,
            self.mandarin_language,
            self.tts_connect_timeout_seconds,
            self.tts_request_timeout_seconds,
            self.audio_temp_dir.display(),
            self.max_upload_bytes,
            self.max_images_per_upload,
            self.session_ttl_seconds,
        )
    }
}

/// Show at most the first four characters of a secret
fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
