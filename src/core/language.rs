//! Spoken output languages offered in the UI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language the summary is spoken in
///
/// The two options are mutually exclusive; every request resolves to exactly
/// one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Mandarin Chinese ("中文")
    #[default]
    Chinese,
    /// Taiwanese Hokkien ("台語")
    Taiwanese,
}

impl Language {
    /// All selectable languages, in UI order
    pub const ALL: [Language; 2] = [Language::Chinese, Language::Taiwanese];

    /// Stable identifier used in forms and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Chinese => "chinese",
            Language::Taiwanese => "taiwanese",
        }
    }

    /// Label shown next to the radio button
    pub fn label(&self) -> &'static str {
        match self {
            Language::Chinese => "中文",
            Language::Taiwanese => "台語",
        }
    }

    /// Parse a form or API value
    ///
    /// Accepts the identifier, the English name and the UI label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "chinese" | "mandarin" | "zh" | "中文" => Some(Language::Chinese),
            "taiwanese" | "taigi" | "hokkien" | "台語" | "台语" => Some(Language::Taiwanese),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
