//! Mandarin TTS provider implementation.
//!
//! # API Reference
//!
//! - Endpoint: `GET https://translate.google.com/translate_tts`
//! - Query: `ie=UTF-8&client=tw-ob&tl=<tag>&q=<text>&total=<n>&idx=<i>&textlen=<len>`
//! - Output: mp3
//! - Limit: 100 characters per request

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tempfile::TempPath;
use tracing::{debug, info, warn};

use super::config::MandarinTTSConfig;
use crate::core::language::Language;
use crate::core::tts::base::{
    AudioClip, BaseTTS, TTSConfig, TTSError, TTSResult, ensure_speakable,
};
use crate::utils::generate_safe_filename;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0 Safari/537.36";
const REFERER: &str = "https://translate.google.com/";

/// Characters after which a chunk may end
fn is_break_char(c: char) -> bool {
    matches!(
        c,
        '。' | '！' | '？' | '；' | '，' | '、' | '：' | ',' | '.' | '!' | '?' | ';' | ':'
    ) || c.is_whitespace()
}

/// Split text into pieces no longer than `max_chars` characters
///
/// Pieces end after punctuation or whitespace where possible; a run with no
/// break point longer than `max_chars` is cut at the limit. Empty pieces are
/// dropped and every piece is trimmed.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    let mut segments = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if is_break_char(c) {
            let end = i + c.len_utf8();
            segments.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    let mut flush = |current: &mut String, current_len: &mut usize| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        current.clear();
        *current_len = 0;
    };

    for segment in segments {
        let segment_len = segment.chars().count();
        if segment_len > max_chars {
            flush(&mut current, &mut current_len);
            let chars: Vec<char> = segment.chars().collect();
            for piece in chars.chunks(max_chars) {
                current.extend(piece.iter());
                current_len = piece.len();
                flush(&mut current, &mut current_len);
            }
        } else if current_len + segment_len > max_chars {
            flush(&mut current, &mut current_len);
            current.push_str(segment);
            current_len = segment_len;
        } else {
            current.push_str(segment);
            current_len += segment_len;
        }
    }
    flush(&mut current, &mut current_len);

    chunks
}

/// Mandarin TTS provider backed by the Google Translate speech endpoint
///
/// Audio for every chunk is concatenated, written to a uniquely named file in
/// the configured temp directory, read back, and the file is removed before
/// returning, on success and on failure alike.
pub struct MandarinTTS {
    config: MandarinTTSConfig,
    http_client: reqwest::Client,
}

impl MandarinTTS {
    /// Create a new Mandarin TTS instance
    pub fn new(config: TTSConfig) -> TTSResult<Self> {
        let config = MandarinTTSConfig::from_base(config)?;
        let http_client = config.base.build_http_client()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Resolved provider configuration
    pub fn config(&self) -> &MandarinTTSConfig {
        &self.config
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> TTSResult<Bytes> {
        let textlen = chunk.chars().count().to_string();
        let total = total.to_string();
        let idx = idx.to_string();

        debug!(
            chunk_chars = %textlen,
            idx = %idx,
            total = %total,
            language = %self.config.language_tag,
            "Mandarin TTS chunk request"
        );

        let response = self
            .http_client
            .get(&self.config.endpoint)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::REFERER, REFERER)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.config.language_tag.as_str()),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TTSError::ProviderError {
                status: status.as_u16(),
                message: truncate_message(&body),
            });
        }

        Ok(response.bytes().await?)
    }

    /// Write the audio to a scoped temp file and read it back
    async fn round_trip_through_file(&self, audio: &[u8]) -> TTSResult<Vec<u8>> {
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;

        let path = self.config.temp_dir.join(generate_safe_filename());
        // Guard first so the file is removed even if the write fails half way
        let guard = TempPath::try_from_path(path)?;

        tokio::fs::write(&guard, audio).await?;
        let data = tokio::fs::read(&guard).await;

        let temp_file = guard.display().to_string();
        if let Err(e) = guard.close() {
            warn!(path = %temp_file, error = %e, "Failed to remove temporary audio file");
        }

        Ok(data?)
    }
}

fn truncate_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(200).collect()
}

#[async_trait]
impl BaseTTS for MandarinTTS {
    fn provider_name(&self) -> &'static str {
        "mandarin"
    }

    fn language(&self) -> Language {
        Language::Chinese
    }

    async fn synthesize(&self, text: &str) -> TTSResult<AudioClip> {
        ensure_speakable(text)?;
        let chunks = chunk_text(text, self.config.max_chunk_chars);
        let total = chunks.len();

        let mut audio = BytesMut::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, idx, total).await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(TTSError::AudioGenerationFailed(
                "Mandarin TTS returned no audio".to_string(),
            ));
        }

        let data = self.round_trip_through_file(&audio).await?;

        info!(
            chunks = total,
            audio_bytes = data.len(),
            "Mandarin TTS synthesis complete"
        );

        Ok(AudioClip::mp3(data, Language::Chinese))
    }

    fn get_provider_info(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": "mandarin",
            "language": Language::Chinese.as_str(),
            "language_tag": self.config.language_tag,
            "api_type": "HTTP REST",
            "endpoint": self.config.endpoint,
            "output_format": "mp3",
            "max_chunk_chars": self.config.max_chunk_chars,
        })
    }
}
