//! Announcement request types shared by the pipeline, gateway, and CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Languages an announcement can be spoken in.
///
/// `Indonesian` is the language announcements are written in; picking it
/// means the text is spoken as typed, with no translation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Mandarin,
}

impl Language {
    /// The language announcement text is assumed to be written in.
    pub const SOURCE: Language = Language::Indonesian;

    pub const ALL: [Language; 3] = [Language::Indonesian, Language::English, Language::Mandarin];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::Indonesian => "id",
            Language::English => "en",
            Language::Mandarin => "zh",
        }
    }

    /// English name, as used in translation prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Indonesian => "Indonesian",
            Language::English => "English",
            Language::Mandarin => "Mandarin Chinese",
        }
    }

    pub fn is_source(self) -> bool {
        self == Self::SOURCE
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts either the ISO code or the English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(needle)
                    || lang.display_name().eq_ignore_ascii_case(needle)
            })
            .or_else(|| match needle.to_ascii_lowercase().as_str() {
                "ind" | "bahasa" | "bahasa indonesia" => Some(Language::Indonesian),
                "mandarin" | "chinese" => Some(Language::Mandarin),
                _ => None,
            })
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Announcement text must not be empty")]
pub struct EmptyAnnouncement;

/// A single announcement to be spoken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRequest {
    pub text: String,
    #[serde(default)]
    pub language: Language,
}

impl AnnouncementRequest {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    /// The trimmed text, or an error if nothing but whitespace was typed.
    pub fn validated_text(&self) -> Result<&str, EmptyAnnouncement> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(EmptyAnnouncement);
        }
        Ok(text)
    }
}
