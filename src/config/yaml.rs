use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional so a file may set only what it needs; anything
/// left out falls back to environment variables and then to defaults.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8501
///
/// providers:
///   huggingface_api_key: "hf_..."
///   taiwanese_tts_url: "https://api-inference.huggingface.co/models/ylac/taigi-tts"
///   mandarin_tts_url: "https://translate.google.com/translate_tts"
///   mandarin_language: "zh"
///
/// tts:
///   connect_timeout_seconds: 10
///   request_timeout_seconds: 30
///   temp_dir: "/tmp/label-reader"
///
/// uploads:
///   max_bytes: 20971520
///   max_images: 20
///
/// sessions:
///   ttl_seconds: 3600
///
/// security:
///   cors_allowed_origins: "https://labels.example.com"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub providers: Option<ProvidersYaml>,
    pub tts: Option<TtsYaml>,
    pub uploads: Option<UploadsYaml>,
    pub sessions: Option<SessionsYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Speech backend credentials and endpoints from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersYaml {
    /// Hugging Face token for the Taiwanese inference endpoint
    pub huggingface_api_key: Option<String>,
    pub taiwanese_tts_url: Option<String>,
    pub mandarin_tts_url: Option<String>,
    /// Language tag passed to the Mandarin endpoint
    pub mandarin_language: Option<String>,
}

/// Synthesis timeouts and scratch space from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub connect_timeout_seconds: Option<u64>,
    pub request_timeout_seconds: Option<u64>,
    pub temp_dir: Option<PathBuf>,
}

/// Upload limits from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct UploadsYaml {
    pub max_bytes: Option<usize>,
    pub max_images: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SessionsYaml {
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// Comma-separated origins, or "*"
    pub cors_allowed_origins: Option<String>,
}

impl YamlConfig {
    /// Load and parse a YAML configuration file
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
