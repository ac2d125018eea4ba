use async_trait::async_trait;

use crate::extraction::chain::{ExtractionStrategy, StrategyError};
use crate::extraction::document::{ExtractedText, RawDocument};

/// Decodes the upload as UTF-8. The text is passed on exactly as uploaded.
pub struct PlainTextStrategy;

#[async_trait]
impl ExtractionStrategy for PlainTextStrategy {
    fn name(&self) -> &'static str {
        "plain_text"
    }

    async fn extract(&self, document: &RawDocument) -> Result<ExtractedText, StrategyError> {
        let text = std::str::from_utf8(document.content())
            .map_err(|e| StrategyError::Failed(format!("file is not valid UTF-8 text: {e}")))?;
        ExtractedText::verbatim(text.to_string(), self.name())
    }
}
