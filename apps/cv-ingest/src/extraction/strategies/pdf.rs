use async_trait::async_trait;

use crate::extraction::chain::{run_blocking, ExtractionStrategy, StrategyError};
use crate::extraction::document::{ExtractedText, RawDocument};
use crate::extraction::strategies::normalize_extracted_text;

/// Reads the PDF text layer. Scanned or image-only PDFs have none and fail the quality bar.
pub struct PdfTextLayerStrategy;

#[async_trait]
impl ExtractionStrategy for PdfTextLayerStrategy {
    fn name(&self) -> &'static str {
        "pdf_text_layer"
    }

    async fn extract(&self, document: &RawDocument) -> Result<ExtractedText, StrategyError> {
        let raw = run_blocking(document, |bytes| {
            pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| StrategyError::Failed(format!("failed to read PDF text layer: {e}")))
        })
        .await?;

        ExtractedText::new(normalize_extracted_text(&raw), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_fail_without_panicking_the_caller() {
        let doc = RawDocument::new(
            b"%PDF-1.4\nthis is not really a pdf".to_vec(),
            "cv.pdf",
            "application/pdf",
        );
        let result = PdfTextLayerStrategy.extract(&doc).await;
        assert!(matches!(
            result,
            Err(StrategyError::Failed(_)) | Err(StrategyError::Crashed(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_input_fails() {
        let doc = RawDocument::new(Vec::<u8>::new(), "cv.pdf", "application/pdf");
        assert!(PdfTextLayerStrategy.extract(&doc).await.is_err());
    }
}
