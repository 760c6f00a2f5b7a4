//! Media pipeline: PCM decoding, audio buffers, local playback.

use thiserror::Error;

pub mod buffer;
pub mod pcm;
#[cfg(feature = "playback")]
pub mod playback;

pub use buffer::{AudioBuffer, PcmFormat};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 audio: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid PCM format: {0}")]
    InvalidFormat(String),
}

#[cfg(feature = "playback")]
pub use playback::{PlaybackError, Player};
