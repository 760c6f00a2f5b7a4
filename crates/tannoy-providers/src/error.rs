use thiserror::Error;

use crate::speech::MissingAudio;

/// Failure talking to the model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No audio in response: {0}")]
    MissingAudio(#[from] MissingAudio),

    #[error("Model returned no text")]
    EmptyText,
}
