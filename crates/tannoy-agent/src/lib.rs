//! Announcement pipeline.
//!
//! An [`Announcer`] takes an [`AnnouncementRequest`], translates the text
//! when a non-source language is requested, and asks the speech model to
//! read the result. It holds no per-request state, so one instance is built
//! at startup and shared.
//!
//! [`AnnouncementRequest`]: tannoy_core::types::AnnouncementRequest

use thiserror::Error;

use tannoy_core::types::EmptyAnnouncement;
use tannoy_media::DecodeError;
use tannoy_providers::ProviderError;

pub mod announcer;

pub use announcer::Announcer;

/// Why an announcement could not be produced.
///
/// The `Display` text is what users see.
#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("{0}")]
    Validation(#[from] EmptyAnnouncement),

    #[error("Translation failed: {0}")]
    Translation(#[source] ProviderError),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[source] ProviderError),

    #[error("Could not decode audio: {0}")]
    Decode(#[from] DecodeError),
}
