//! Mandarin TTS provider module.
//!
//! Speaks Mandarin text through the Google Translate speech endpoint. Long
//! texts are split into chunks of at most 100 characters and the returned mp3
//! segments are joined into a single clip.
//!
//! # Example
//!
//! ```rust,ignore
//! use label_reader::core::tts::{BaseTTS, MandarinTTS, TTSConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tts = MandarinTTS::new(TTSConfig::default()).unwrap();
//!     let clip = tts.synthesize("你好").await.unwrap();
//!     println!("{} bytes", clip.len());
//! }
//! ```

mod config;
mod provider;

pub use config::{DEFAULT_LANGUAGE_TAG, MANDARIN_TTS_URL, MAX_CHUNK_CHARS, MandarinTTSConfig};
pub use provider::{MandarinTTS, chunk_text};
