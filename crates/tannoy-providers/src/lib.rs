//! Model provider clients.
//!
//! The orchestrator talks to two narrow traits, [`Translator`] and
//! [`SpeechSynthesizer`]. The Gemini implementations share one
//! [`GeminiClient`] built at startup and passed in.

use async_trait::async_trait;

use tannoy_core::types::Language;

pub mod error;
pub mod gemini;
pub mod speech;
pub mod translate;

pub use error::ProviderError;
pub use gemini::GeminiClient;
pub use speech::{GeminiSpeech, MissingAudio};
pub use translate::{GeminiTranslator, translation_prompt};

/// Base64-encoded audio returned by the speech model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub data: String,
    pub mime_type: Option<String>,
}

/// Translates announcement text into another language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target`, returning only the translated text.
    async fn translate(&self, text: &str, target: Language) -> Result<String, ProviderError>;
}

/// Turns text into spoken audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, ProviderError>;
}
