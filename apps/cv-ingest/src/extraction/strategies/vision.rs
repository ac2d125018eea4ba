use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};

use crate::extraction::chain::{ExtractionStrategy, StrategyError};
use crate::extraction::document::{ExtractedText, RawDocument};
use crate::extraction::router::essence;
use crate::extraction::strategies::normalize_extracted_text;
use crate::llm_client::{ChatMessage, ChatRequest, CompletionClient};

pub const VISION_INSTRUCTION: &str = "Extract all readable text from this image of a CV or résumé. \
Preserve the structure: keep headings, sections, bullet points and line breaks in reading order. \
Transcribe literally. Do not summarise, translate, correct or add any commentary. \
Output only the extracted text.";

/// Transcribes a raster image through a vision-capable completion call.
/// Deterministic (temperature 0); the only strategy for image uploads.
pub struct VisionStrategy {
    llm: Arc<dyn CompletionClient>,
    model: String,
    max_tokens: u32,
}

impl VisionStrategy {
    pub fn new(llm: Arc<dyn CompletionClient>, model: &str, max_tokens: u32) -> Self {
        Self {
            llm,
            model: model.to_string(),
            max_tokens,
        }
    }
}

/// Inline `data:` URI for the image bytes.
pub fn image_data_uri(media_type: &str, bytes: &[u8]) -> String {
    let media_type = match essence(media_type).as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        other => other.to_string(),
    };
    let b64 = general_purpose::STANDARD.encode(bytes);
    format!("data:{media_type};base64,{b64}")
}

#[async_trait]
impl ExtractionStrategy for VisionStrategy {
    fn name(&self) -> &'static str {
        "vision_transcription"
    }

    #[tracing::instrument(skip(self, document), fields(filename = %document.filename(), model = %self.model))]
    async fn extract(&self, document: &RawDocument) -> Result<ExtractedText, StrategyError> {
        let data_uri = image_data_uri(document.media_type(), document.content());

        let request = ChatRequest::new(self.model.as_str())
            .message(ChatMessage::user_with_image(VISION_INSTRUCTION, data_uri))
            .max_tokens(self.max_tokens)
            .temperature(0.0);

        let transcription = self.llm.complete(&request).await?;
        ExtractedText::new(normalize_extracted_text(&transcription), self.name())
    }
}
