//! Translate-then-speak orchestration.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use tannoy_core::config::Config;
use tannoy_core::types::{AnnouncementRequest, Language};
use tannoy_media::{AudioBuffer, PcmFormat};
use tannoy_providers::{
    GeminiClient, GeminiSpeech, GeminiTranslator, ProviderError, SpeechSynthesizer, SynthesizedAudio, Translator,
};

use crate::AnnounceError;

pub struct Announcer {
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl Announcer {
    pub fn new(translator: Arc<dyn Translator>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            translator,
            synthesizer,
        }
    }

    /// Wire up the Gemini clients described by `config`, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Self {
        let client = GeminiClient::from_config(config);
        let translator = GeminiTranslator::new(client.clone(), config.translation_model());
        let synthesizer = GeminiSpeech::new(client, config.speech_model(), config.voice());
        Self::new(Arc::new(translator), Arc::new(synthesizer))
    }

    /// Validate the request and produce the text that should be spoken.
    pub async fn spoken_text(&self, request: &AnnouncementRequest) -> Result<String, AnnounceError> {
        let text = request.validated_text()?;

        match request.language {
            Language::Indonesian => {
                debug!("Source language requested, skipping translation");
                Ok(text.to_string())
            }
            target @ (Language::English | Language::Mandarin) => {
                debug!(language = target.code(), "Translating announcement");
                self.translator
                    .translate(text, target)
                    .await
                    .and_then(|t| {
                        let t = t.trim();
                        if t.is_empty() {
                            Err(ProviderError::EmptyText)
                        } else {
                            Ok(t.to_string())
                        }
                    })
                    .map_err(|e| {
                        warn!(language = target.code(), error = %e, "Translation failed");
                        AnnounceError::Translation(e)
                    })
            }
        }
    }

    /// Run the full pipeline and return the base64 PCM payload.
    pub async fn announce(
        &self,
        request: &AnnouncementRequest,
    ) -> Result<SynthesizedAudio, AnnounceError> {
        let start = Instant::now();
        let text = self.spoken_text(request).await?;

        let audio = self.synthesizer.synthesize(&text).await.map_err(|e| {
            warn!(error = %e, "Speech synthesis failed");
            AnnounceError::Synthesis(e)
        })?;

        info!(
            language = request.language.code(),
            chars = text.chars().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Announcement synthesized"
        );
        Ok(audio)
    }

    /// Run the pipeline and decode the payload into a playable buffer.
    pub async fn announce_decoded(
        &self,
        request: &AnnouncementRequest,
        format: PcmFormat,
    ) -> Result<AudioBuffer, AnnounceError> {
        let audio = self.announce(request).await?;
        Ok(AudioBuffer::from_base64(&audio.data, format)?)
    }
}
