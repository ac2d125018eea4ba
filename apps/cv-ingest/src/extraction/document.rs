use bytes::Bytes;

use crate::extraction::chain::StrategyError;

/// Minimum number of characters (after trimming) for extracted text to count as usable.
pub const QUALITY_BAR_CHARS: usize = 50;

/// An uploaded file as received at the pipeline boundary. Never mutated.
#[derive(Debug, Clone)]
pub struct RawDocument {
    content: Bytes,
    filename: String,
    media_type: String,
}

impl RawDocument {
    pub fn new(
        content: impl Into<Bytes>,
        filename: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
            media_type: media_type.into(),
        }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn byte_len(&self) -> usize {
        self.content.len()
    }
}

/// Text pulled out of a document, tagged with the strategy that produced it.
///
/// Built through [`ExtractedText::new`], which enforces the quality bar, or
/// [`ExtractedText::verbatim`] for uploads that already are text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    content: String,
    strategy: &'static str,
}

impl ExtractedText {
    pub fn new(content: String, strategy: &'static str) -> Result<Self, StrategyError> {
        let chars = quality_chars(&content);
        if chars < QUALITY_BAR_CHARS {
            return Err(StrategyError::BelowQualityBar { chars });
        }
        Ok(Self { content, strategy })
    }

    /// Accepts any text with at least one non-whitespace character.
    pub fn verbatim(content: String, strategy: &'static str) -> Result<Self, StrategyError> {
        if content.trim().is_empty() {
            return Err(StrategyError::Empty);
        }
        Ok(Self { content, strategy })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Character count used against the quality bar.
pub fn quality_chars(text: &str) -> usize {
    text.trim().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_fifty_chars_after_trim_is_accepted() {
        let text = format!("  \n{}\n\t ", "a".repeat(50));
        let extracted = ExtractedText::new(text.clone(), "plain_text").unwrap();
        assert_eq!(extracted.content(), text);
        assert_eq!(extracted.strategy(), "plain_text");
    }

    #[test]
    fn test_forty_nine_chars_is_rejected() {
        let result = ExtractedText::new(format!(" {} ", "a".repeat(49)), "plain_text");
        match result {
            Err(StrategyError::BelowQualityBar { chars }) => assert_eq!(chars, 49),
            other => panic!("Expected BelowQualityBar, got {other:?}"),
        }
    }

    #[test]
    fn test_quality_bar_counts_chars_not_bytes() {
        // 50 two-byte characters
        assert!(ExtractedText::new("é".repeat(50), "pdf_text_layer").is_ok());
        assert!(ExtractedText::new("é".repeat(49), "pdf_text_layer").is_err());
        assert_eq!(quality_chars(" é "), 1);
    }

    #[test]
    fn test_verbatim_skips_quality_bar() {
        let extracted = ExtractedText::verbatim("John Smith".to_string(), "plain_text").unwrap();
        assert_eq!(extracted.content(), "John Smith");
        assert!(matches!(
            ExtractedText::verbatim(" \n\t".to_string(), "plain_text"),
            Err(StrategyError::Empty)
        ));
    }

    #[test]
    fn test_raw_document_reports_length() {
        let doc = RawDocument::new(vec![1u8, 2, 3], "cv.pdf", "application/pdf");
        assert_eq!(doc.byte_len(), 3);
        assert_eq!(doc.filename(), "cv.pdf");
        assert_eq!(doc.media_type(), "application/pdf");
    }
}
