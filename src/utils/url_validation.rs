//! Endpoint URL validation for configured TTS backends
//!
//! Both speech backends are reached over HTTP(S). This module makes sure a
//! configured endpoint:
//! - Parses as an absolute URL
//! - Uses the `http` or `https` scheme
//! - Has a host

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors that can occur during URL validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,
}

/// Validate a backend endpoint URL
///
/// Plain `http` is accepted so that local inference servers and test doubles
/// can be used, but a warning is logged for it.
///
/// # Arguments
/// * `raw` - The URL as written in configuration
///
/// # Returns
/// * `Result<Url, UrlValidationError>` - The parsed URL or the reason it was rejected
pub fn validate_endpoint_url(raw: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(raw.trim())?;

    match url.scheme() {
        "https" => {}
        "http" => {
            warn!(url = %url, "Endpoint uses plain HTTP");
        }
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https() {
        let url =
            validate_endpoint_url("https://api-inference.huggingface.co/models/ylac/taigi-tts")
                .unwrap();
        assert_eq!(url.host_str(), Some("api-inference.huggingface.co"));
    }

    #[test]
    fn test_accepts_http_for_local_backends() {
        assert!(validate_endpoint_url("http://127.0.0.1:8080/tts").is_ok());
    }

    #[test]
    fn test_trims_whitespace() {
        assert!(validate_endpoint_url("  https://translate.google.com/translate_tts \n").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            validate_endpoint_url("ftp://example.com/tts"),
            Err(UrlValidationError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_rejects_relative_url() {
        assert!(matches!(
            validate_endpoint_url("/models/taigi"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_missing_host() {
        assert!(validate_endpoint_url("https://").is_err());
    }
}
