//! Speech synthesis via a Gemini audio model.
//!
//! The model is asked for an audio-only response in a fixed prebuilt voice.
//! The audio comes back as base64 raw PCM in the first candidate's first
//! content part.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::gemini::{
    GeminiClient, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use crate::{ProviderError, SpeechSynthesizer, SynthesizedAudio};

/// Which piece of the response was absent when looking for audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingAudio {
    #[error("response has no candidates")]
    NoCandidates,
    #[error("first candidate has no content")]
    NoContent,
    #[error("first candidate has no content parts")]
    NoParts,
    #[error("first content part has no inline data")]
    NoInlineData,
    #[error("inline data is empty")]
    EmptyData,
}

/// Pull the inline audio out of `candidates[0].content.parts[0]`.
pub fn extract_inline_audio(
    response: &GenerateContentResponse,
) -> Result<SynthesizedAudio, MissingAudio> {
    let candidate = response.candidates.first().ok_or(MissingAudio::NoCandidates)?;
    let content = candidate.content.as_ref().ok_or(MissingAudio::NoContent)?;
    let part = content.parts.first().ok_or(MissingAudio::NoParts)?;
    let inline = part.inline_data.as_ref().ok_or(MissingAudio::NoInlineData)?;
    if inline.data.is_empty() {
        return Err(MissingAudio::EmptyData);
    }
    Ok(SynthesizedAudio {
        data: inline.data.clone(),
        mime_type: inline.mime_type.clone(),
    })
}

pub struct GeminiSpeech {
    client: GeminiClient,
    model: String,
    voice: String,
}

impl GeminiSpeech {
    pub fn new(client: GeminiClient, model: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            voice: voice.into(),
        }
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".into()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
            }),
            ..GenerateContentRequest::text(text)
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiSpeech {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, ProviderError> {
        let request = self.build_request(text);
        let response = self.client.generate_content(&self.model, &request).await?;
        let audio = extract_inline_audio(&response)?;

        debug!(
            voice = %self.voice,
            encoded_len = audio.data.len(),
            mime_type = audio.mime_type.as_deref().unwrap_or("unknown"),
            "Speech received"
        );
        Ok(audio)
    }
}
