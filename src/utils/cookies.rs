//! Minimal cookie helpers for the browser session id.

use http::{HeaderMap, HeaderValue, header::COOKIE};

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "label_session";

/// Read a cookie value by name from the request headers
///
/// Handles multiple `Cookie` headers and `a=1; b=2` lists.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Build the `Set-Cookie` header value for a session id
pub fn session_cookie_header(session_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}
