//! Translation via a Gemini text model.

use async_trait::async_trait;
use tracing::debug;

use tannoy_core::types::Language;

use crate::gemini::{GeminiClient, GenerateContentRequest};
use crate::{ProviderError, Translator};

/// Build the instruction sent to the text model.
pub fn translation_prompt(text: &str, target: Language) -> String {
    format!(
        "Translate the following text to {}. Return only the translated text.\n\n{text}",
        target.display_name()
    )
}

pub struct GeminiTranslator {
    client: GeminiClient,
    model: String,
}

impl GeminiTranslator {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::text(translation_prompt(text, target));
        let response = self.client.generate_content(&self.model, &request).await?;

        let translated = response.text().unwrap_or_default().trim().to_string();
        if translated.is_empty() {
            return Err(ProviderError::EmptyText);
        }

        debug!(language = target.code(), chars = translated.len(), "Translation received");
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_language_and_embeds_text() {
        let prompt = translation_prompt("Toko akan tutup", Language::English);
        assert!(prompt.contains("Toko akan tutup"));
        assert!(prompt.contains("English"));
        assert!(prompt.contains("Return only the translated text"));
    }

    #[test]
    fn test_prompt_uses_display_name_not_code() {
        let prompt = translation_prompt("Diskon", Language::Mandarin);
        assert!(prompt.contains("Mandarin Chinese"));
        assert!(!prompt.contains(" zh"));
    }
}
