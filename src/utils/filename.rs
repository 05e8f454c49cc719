//! Unique filenames for locally written audio.

use uuid::Uuid;

/// Extension appended to every generated audio filename
pub const AUDIO_FILE_EXTENSION: &str = ".mp3";

/// Generate a collision-resistant filename for a synthesized clip.
///
/// Each call produces a fresh v4 UUID followed by [`AUDIO_FILE_EXTENSION`].
/// No filesystem access happens here; callers decide where the file lives.
pub fn generate_safe_filename() -> String {
    format!("{}{}", Uuid::new_v4(), AUDIO_FILE_EXTENSION)
}
