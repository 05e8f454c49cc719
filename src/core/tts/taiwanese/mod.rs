//! Taiwanese TTS provider module.
//!
//! Sends text to a Hugging Face inference endpoint hosting a Taiwanese
//! Hokkien (Taigi) speech model and returns the audio bytes from the response.
//!
//! # Authentication
//!
//! A Hugging Face API key is required (`HUGGINGFACE_API_KEY`) and is sent as
//! a bearer token.

mod config;
mod provider;

pub use config::{TAIWANESE_TTS_URL, TaiwaneseTTSConfig};
pub use provider::TaiwaneseTTS;
