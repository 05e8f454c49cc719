//! Environment variable access.

use std::str::FromStr;

/// Environment variable names
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const HUGGINGFACE_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const TAIWANESE_TTS_URL: &str = "TAIWANESE_TTS_URL";
pub const MANDARIN_TTS_URL: &str = "MANDARIN_TTS_URL";
pub const MANDARIN_LANGUAGE: &str = "MANDARIN_LANGUAGE";
pub const TTS_CONNECT_TIMEOUT_SECONDS: &str = "TTS_CONNECT_TIMEOUT_SECONDS";
pub const TTS_REQUEST_TIMEOUT_SECONDS: &str = "TTS_REQUEST_TIMEOUT_SECONDS";
pub const AUDIO_TEMP_DIR: &str = "AUDIO_TEMP_DIR";
pub const MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";
pub const MAX_IMAGES_PER_UPLOAD: &str = "MAX_IMAGES_PER_UPLOAD";
pub const SESSION_TTL_SECONDS: &str = "SESSION_TTL_SECONDS";
pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";

/// Every variable the loader reads
pub const ALL_VARS: [&str; 13] = [
    HOST,
    PORT,
    HUGGINGFACE_API_KEY,
    TAIWANESE_TTS_URL,
    MANDARIN_TTS_URL,
    MANDARIN_LANGUAGE,
    TTS_CONNECT_TIMEOUT_SECONDS,
    TTS_REQUEST_TIMEOUT_SECONDS,
    AUDIO_TEMP_DIR,
    MAX_UPLOAD_BYTES,
    MAX_IMAGES_PER_UPLOAD,
    SESSION_TTL_SECONDS,
    CORS_ALLOWED_ORIGINS,
];

/// Read a variable, treating blank values as unset
pub fn string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read and parse a variable; a malformed value is an error naming it
pub fn parse<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match string(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {name}: '{raw}' ({e})")),
    }
}
