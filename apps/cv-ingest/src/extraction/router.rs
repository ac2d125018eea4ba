use serde::Serialize;

use crate::errors::PipelineError;
use crate::extraction::document::RawDocument;

/// Hard ceiling on upload size: 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Handling branch chosen from the declared media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaBranch {
    PlainText,
    Pdf,
    Word,
    Image,
    Unsupported,
}

const PLAIN_TEXT_TYPES: &[&str] = &["text/plain", "text/markdown", "text/x-markdown", "text/csv"];

const WORD_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

const IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

impl MediaBranch {
    /// Classifies a declared media type. Total: anything unknown is `Unsupported`.
    pub fn route(media_type: &str) -> Self {
        let essence = essence(media_type);
        let essence = essence.as_str();

        if PLAIN_TEXT_TYPES.contains(&essence) {
            MediaBranch::PlainText
        } else if essence == "application/pdf" {
            MediaBranch::Pdf
        } else if WORD_TYPES.contains(&essence) {
            MediaBranch::Word
        } else if IMAGE_TYPES.contains(&essence) {
            MediaBranch::Image
        } else {
            MediaBranch::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaBranch::PlainText => "plain_text",
            MediaBranch::Pdf => "pdf",
            MediaBranch::Word => "word",
            MediaBranch::Image => "image",
            MediaBranch::Unsupported => "unsupported",
        }
    }
}

/// Lower-cased media type without parameters (`; charset=...`).
pub(crate) fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Rejects oversized payloads. Runs before routing or any extraction work.
pub fn check_payload_size(document: &RawDocument, limit: usize) -> Result<(), PipelineError> {
    let size = document.byte_len();
    if size > limit {
        return Err(PipelineError::PayloadTooLarge { size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_known_types() {
        assert_eq!(MediaBranch::route("text/plain"), MediaBranch::PlainText);
        assert_eq!(MediaBranch::route("text/markdown"), MediaBranch::PlainText);
        assert_eq!(MediaBranch::route("application/pdf"), MediaBranch::Pdf);
        assert_eq!(
            MediaBranch::route(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            MediaBranch::Word
        );
        assert_eq!(MediaBranch::route("application/msword"), MediaBranch::Word);
        assert_eq!(MediaBranch::route("image/png"), MediaBranch::Image);
        assert_eq!(MediaBranch::route("image/jpeg"), MediaBranch::Image);
    }

    #[test]
    fn test_parameters_and_case_ignored() {
        assert_eq!(
            MediaBranch::route("Text/Plain; charset=UTF-8"),
            MediaBranch::PlainText
        );
        assert_eq!(MediaBranch::route(" APPLICATION/PDF "), MediaBranch::Pdf);
    }

    #[test]
    fn test_unknown_types_are_unsupported() {
        for media_type in ["", "application/zip", "image/heic", "video/mp4", "garbage"] {
            assert_eq!(MediaBranch::route(media_type), MediaBranch::Unsupported);
        }
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let at_limit = RawDocument::new(vec![0u8; 16], "a.txt", "text/plain");
        assert!(check_payload_size(&at_limit, 16).is_ok());

        let over = RawDocument::new(vec![0u8; 17], "a.txt", "text/plain");
        match check_payload_size(&over, 16) {
            Err(PipelineError::PayloadTooLarge { size, limit }) => {
                assert_eq!(size, 17);
                assert_eq!(limit, 16);
            }
            other => panic!("Expected PayloadTooLarge, got {other:?}"),
        }
    }
}
