//! Embedded audio players.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use crate::core::tts::AudioFormat;

/// Default heading when no label is given
pub const DEFAULT_AUDIO_LABEL: &str = "語音播放";

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Heading plus an `<audio>` element with the clip inlined as a `data:` URI
///
/// The player needs no further request to play.
pub fn play_audio(audio: &[u8], label: &str) -> String {
    let format = AudioFormat::Mp3;
    let label = if label.trim().is_empty() {
        DEFAULT_AUDIO_LABEL
    } else {
        label
    };

    format!(
        "<h4>{label}</h4>\n<audio controls>\n  <source src=\"data:{mime};base64,{data}\" type=\"{mime}\">\n</audio>\n",
        label = escape_html(label),
        mime = format.html_mime_type(),
        data = BASE64.encode(audio),
    )
}
