//! Checks applied to a fully merged configuration.

use super::ServerConfig;
use crate::utils::validate_endpoint_url;

pub fn validate_port(port: u16) -> Result<(), String> {
    if port == 0 {
        return Err("port must be non-zero".to_string());
    }
    Ok(())
}

pub fn validate_timeouts(connect_seconds: u64, request_seconds: u64) -> Result<(), String> {
    if connect_seconds == 0 {
        return Err("tts connect timeout must be greater than zero".to_string());
    }
    if request_seconds == 0 {
        return Err("tts request timeout must be greater than zero".to_string());
    }
    Ok(())
}

pub fn validate_endpoint(name: &str, url: &str) -> Result<(), String> {
    validate_endpoint_url(url)
        .map(|_| ())
        .map_err(|e| format!("Invalid {name}: {e}"))
}

pub fn validate_upload_limits(max_bytes: usize, max_images: usize) -> Result<(), String> {
    if max_bytes == 0 {
        return Err("max upload bytes must be greater than zero".to_string());
    }
    if max_images == 0 {
        return Err("max images per upload must be at least 1".to_string());
    }
    Ok(())
}

pub fn validate_session_ttl(ttl_seconds: u64) -> Result<(), String> {
    if ttl_seconds == 0 {
        return Err("session ttl must be greater than zero".to_string());
    }
    Ok(())
}

/// Run every check against a merged configuration
pub fn validate_config(config: &ServerConfig) -> Result<(), String> {
    validate_port(config.port)?;
    validate_timeouts(
        config.tts_connect_timeout_seconds,
        config.tts_request_timeout_seconds,
    )?;
    validate_endpoint("taiwanese_tts_url", &config.taiwanese_tts_url)?;
    validate_endpoint("mandarin_tts_url", &config.mandarin_tts_url)?;
    validate_upload_limits(config.max_upload_bytes, config.max_images_per_upload)?;
    validate_session_ttl(config.session_ttl_seconds)?;
    Ok(())
}
