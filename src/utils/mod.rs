pub mod cookies;
pub use cookies::{SESSION_COOKIE, read_cookie, session_cookie_header};
pub mod filename;
pub use filename::{AUDIO_FILE_EXTENSION, generate_safe_filename};
pub mod url_validation;
pub use url_validation::{UrlValidationError, validate_endpoint_url};
