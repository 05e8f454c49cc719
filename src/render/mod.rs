//! HTML rendering for the label reader page.

pub mod audio;
pub mod page;

pub use audio::{DEFAULT_AUDIO_LABEL, escape_html, play_audio};
pub use page::{render_outcome, render_page};
