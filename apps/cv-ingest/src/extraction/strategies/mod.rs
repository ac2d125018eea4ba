pub mod docx;
pub mod pdf;
pub mod text;
pub mod vision;

use std::sync::Arc;

use crate::extraction::chain::{ExtractionChain, ExtractionStrategy};
use crate::extraction::router::MediaBranch;
use crate::llm_client::CompletionClient;

pub use docx::{OoxmlStrategy, WordXmlScanStrategy};
pub use pdf::PdfTextLayerStrategy;
pub use text::PlainTextStrategy;
pub use vision::VisionStrategy;

/// Builds the ordered strategy list for a branch.
///
/// Word never falls back to the vision strategy: vision endpoints do not read
/// Word binaries, so a failed Word document is rejected instead. `Unsupported`
/// gets an empty chain.
pub fn chain_for(
    branch: MediaBranch,
    llm: &Arc<dyn CompletionClient>,
    vision_model: &str,
    vision_max_tokens: u32,
) -> ExtractionChain {
    let strategies: Vec<Arc<dyn ExtractionStrategy>> = match branch {
        MediaBranch::PlainText => vec![Arc::new(PlainTextStrategy)],
        MediaBranch::Word => vec![Arc::new(OoxmlStrategy), Arc::new(WordXmlScanStrategy)],
        MediaBranch::Pdf => vec![Arc::new(PdfTextLayerStrategy)],
        MediaBranch::Image => vec![Arc::new(VisionStrategy::new(
            Arc::clone(llm),
            vision_model,
            vision_max_tokens,
        ))],
        MediaBranch::Unsupported => Vec::new(),
    };
    ExtractionChain::new(strategies)
}

/// Cleans text pulled from binary formats: drops control characters other than
/// newline and tab, trims trailing whitespace and collapses blank-line runs to one.
///
/// Never applied to plain-text uploads.
pub fn normalize_extracted_text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    let mut result = String::with_capacity(cleaned.len());
    let mut prev_was_blank = false;

    for line in cleaned.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            prev_was_blank = true;
            continue;
        }
        if !result.is_empty() {
            result.push_str(if prev_was_blank { "\n\n" } else { "\n" });
        }
        result.push_str(line);
        prev_was_blank = false;
    }

    result
}
