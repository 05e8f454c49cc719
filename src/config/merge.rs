//! Combine environment variables, YAML overrides and defaults.

use std::path::PathBuf;

use super::ServerConfig;
use super::env;
use super::yaml::YamlConfig;
use crate::core::tts::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, MANDARIN_TTS_URL,
    TAIWANESE_TTS_URL,
};
use crate::core::tts::mandarin::DEFAULT_LANGUAGE_TAG;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_MAX_IMAGES_PER_UPLOAD: usize = 20;
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 3600;

/// Pick the YAML value when present, else the environment value
fn pick<T>(yaml: Option<T>, env: Option<T>) -> Option<T> {
    yaml.or(env)
}

/// Build a configuration from the environment, overridden by `yaml` when given
///
/// Priority: YAML > environment (including values loaded from `.env`) > defaults.
pub fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml.unwrap_or_default();
    let server = yaml.server.unwrap_or_default();
    let providers = yaml.providers.unwrap_or_default();
    let tts = yaml.tts.unwrap_or_default();
    let uploads = yaml.uploads.unwrap_or_default();
    let sessions = yaml.sessions.unwrap_or_default();
    let security = yaml.security.unwrap_or_default();

    let non_blank = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let huggingface_api_key = pick(
        non_blank(providers.huggingface_api_key),
        env::string(env::HUGGINGFACE_API_KEY),
    )
    .ok_or_else(|| {
        format!(
            "{} is required (set it in the environment, .env, or providers.huggingface_api_key)",
            env::HUGGINGFACE_API_KEY
        )
    })?;

    Ok(ServerConfig {
        host: pick(non_blank(server.host), env::string(env::HOST))
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: pick(server.port, env::parse(env::PORT)?).unwrap_or(DEFAULT_PORT),
        huggingface_api_key,
        taiwanese_tts_url: pick(
            non_blank(providers.taiwanese_tts_url),
            env::string(env::TAIWANESE_TTS_URL),
        )
        .unwrap_or_else(|| TAIWANESE_TTS_URL.to_string()),
        mandarin_tts_url: pick(
            non_blank(providers.mandarin_tts_url),
            env::string(env::MANDARIN_TTS_URL),
        )
        .unwrap_or_else(|| MANDARIN_TTS_URL.to_string()),
        mandarin_language: pick(
            non_blank(providers.mandarin_language),
            env::string(env::MANDARIN_LANGUAGE),
        )
        .unwrap_or_else(|| DEFAULT_LANGUAGE_TAG.to_string()),
        tts_connect_timeout_seconds: pick(
            tts.connect_timeout_seconds,
            env::parse(env::TTS_CONNECT_TIMEOUT_SECONDS)?,
        )
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        tts_request_timeout_seconds: pick(
            tts.request_timeout_seconds,
            env::parse(env::TTS_REQUEST_TIMEOUT_SECONDS)?,
        )
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        audio_temp_dir: pick(
            tts.temp_dir,
            env::string(env::AUDIO_TEMP_DIR).map(PathBuf::from),
        )
        .unwrap_or_else(std::env::temp_dir),
        max_upload_bytes: pick(uploads.max_bytes, env::parse(env::MAX_UPLOAD_BYTES)?)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        max_images_per_upload: pick(
            uploads.max_images,
            env::parse(env::MAX_IMAGES_PER_UPLOAD)?,
        )
        .unwrap_or(DEFAULT_MAX_IMAGES_PER_UPLOAD),
        session_ttl_seconds: pick(sessions.ttl_seconds, env::parse(env::SESSION_TTL_SECONDS)?)
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
        cors_allowed_origins: pick(
            non_blank(security.cors_allowed_origins),
            env::string(env::CORS_ALLOWED_ORIGINS),
        ),
    })
}
