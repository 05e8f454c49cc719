pub mod language;
pub mod pipeline;
pub mod session;
pub mod summarizer;
pub mod tts;
pub mod upload;

// Re-export commonly used types for convenience
pub use language::Language;

pub use pipeline::{
    ADVANCED_MODE_NOTE, AudioOutcome, ImageOutcome, ImageReport, ImageResult, OutcomeSummary,
    PipelineOptions, process_uploads,
};

pub use session::{SessionId, SessionState, SessionStore};

pub use summarizer::{
    PLACEHOLDER_SUMMARY, PlaceholderSummarizer, SummarizeError, SummarizeResult, Summarizer,
};

pub use tts::{
    AudioClip, AudioFormat, BaseTTS, BoxedTTS, TTSConfig, TTSError, TTSResult, TtsRouter,
    create_tts_provider, get_tts_provider_urls,
};

pub use upload::{ImageError, LabelImage, UploadedImage};
