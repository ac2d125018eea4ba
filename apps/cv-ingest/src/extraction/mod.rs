pub mod chain;
pub mod document;
pub mod router;
pub mod strategies;

pub use chain::{
    AttemptSummary, ChainFailure, ChainSuccess, ExtractionChain, ExtractionStrategy, StrategyError,
};
pub use document::{ExtractedText, RawDocument, QUALITY_BAR_CHARS};
pub use router::{check_payload_size, MediaBranch, MAX_UPLOAD_BYTES};
