//! The CV ingestion pipeline: bytes in, structured profile (or a typed failure) out.
//!
//! Router -> strategy chain -> structuring call -> JSON recovery -> scoring and
//! completeness -> enrichment. Every stage returns a new value; nothing is shared
//! between invocations except the immutable settings and the completion client.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::extraction::strategies::chain_for;
use crate::extraction::{
    check_payload_size, AttemptSummary, ChainFailure, MediaBranch, RawDocument, StrategyError,
    MAX_UPLOAD_BYTES,
};
use crate::llm_client::CompletionClient;
use crate::profile::{
    compute_completeness_report, compute_confidence_score, enrich_profile, BioOptions,
    CompletenessReport, StructuredCVRecord,
};
use crate::structuring::{
    recover_record, structure_text, truncate_for_structuring, Provenance, MAX_STRUCTURING_CHARS,
};

const WORD_UNREADABLE: &str =
    "Could not read this Word document; convert it to PDF or plain text and retry.";
const PDF_UNSUPPORTED: &str = "PDF processing is not supported for this file (it may be scanned or image-only); convert it to an image or plain text and retry.";
const IMAGE_UNREADABLE: &str = "No readable text was found in this image; upload a sharper image, a PDF or a plain text file.";
const NOTHING_EXTRACTED: &str =
    "No CV information could be identified in this document. Check that the file is a CV.";
const MISSING_CREDENTIALS: &str =
    "The AI service is not configured (missing API key). Contact the administrator.";

/// Limits, models and switches the pipeline runs with. Injected, never read from
/// the environment inside the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_upload_bytes: usize,
    pub max_structuring_chars: usize,
    pub structuring_model: String,
    pub structuring_max_tokens: u32,
    pub vision_model: String,
    pub vision_max_tokens: u32,
    pub bio_model: Option<String>,
    pub bio_max_tokens: u32,
    pub generate_bio: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            max_structuring_chars: MAX_STRUCTURING_CHARS,
            structuring_model: "gpt-4o-mini".to_string(),
            structuring_max_tokens: 4000,
            vision_model: "gpt-4o".to_string(),
            vision_max_tokens: 4000,
            bio_model: None,
            bio_max_tokens: 300,
            generate_bio: true,
        }
    }
}

impl PipelineSettings {
    /// The bio call uses the structuring model unless told otherwise.
    pub fn bio_model(&self) -> &str {
        self.bio_model.as_deref().unwrap_or(&self.structuring_model)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub extraction_id: Uuid,
    pub filename: String,
    pub media_type: String,
    pub branch: MediaBranch,
    pub strategy: &'static str,
    pub extracted_chars: usize,
    pub truncated: bool,
    pub failed_attempts: Vec<AttemptSummary>,
    pub bio_generated: bool,
    pub elapsed_ms: u64,
    pub processed_at: DateTime<Utc>,
}

/// A successful run. `confidence_score` and `completeness_report` describe what
/// was extracted from the document, before enrichment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    pub record: StructuredCVRecord,
    pub confidence_score: f64,
    pub completeness_report: CompletenessReport,
    pub provenance: Provenance,
    pub metadata: ExtractionMetadata,
    pub warnings: Vec<String>,
}

/// Transport-neutral result envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: Option<ExtractionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Result<ExtractionOutcome, PipelineError>> for PipelineResponse {
    fn from(result: Result<ExtractionOutcome, PipelineError>) -> Self {
        match result {
            Ok(outcome) => PipelineResponse {
                success: true,
                outcome: Some(outcome),
                error_kind: None,
                message: None,
            },
            Err(e) => PipelineResponse {
                success: false,
                outcome: None,
                error_kind: Some(e.error_kind()),
                message: Some(e.to_string()),
            },
        }
    }
}

pub struct CvPipeline {
    settings: PipelineSettings,
    llm: Arc<dyn CompletionClient>,
}

impl CvPipeline {
    pub fn new(settings: PipelineSettings, llm: Arc<dyn CompletionClient>) -> Self {
        Self { settings, llm }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Whether the completion client has credentials.
    pub fn is_configured(&self) -> bool {
        self.llm.has_credentials()
    }

    #[instrument(skip(self, bytes))]
    pub async fn extract_and_parse(
        &self,
        bytes: impl Into<Bytes>,
        filename: &str,
        media_type: &str,
    ) -> Result<ExtractionOutcome, PipelineError> {
        let started = Instant::now();
        let document = RawDocument::new(bytes, filename, media_type);

        check_payload_size(&document, self.settings.max_upload_bytes)?;
        if !self.llm.has_credentials() {
            return Err(PipelineError::Configuration(MISSING_CREDENTIALS.to_string()));
        }

        let branch = MediaBranch::route(media_type);
        if branch == MediaBranch::Unsupported {
            return Err(PipelineError::UnsupportedMediaType(media_type.to_string()));
        }

        let chain = chain_for(
            branch,
            &self.llm,
            &self.settings.vision_model,
            self.settings.vision_max_tokens,
        );
        let extracted = chain
            .run(&document)
            .await
            .map_err(|failure| exhausted_error(branch, &failure))?;
        let strategy = extracted.text.strategy();
        let extracted_chars = extracted.text.char_count();
        info!(strategy, extracted_chars, branch = branch.as_str(), "Text extracted");

        let mut warnings = Vec::new();
        let (text, truncated) =
            truncate_for_structuring(extracted.text.content(), self.settings.max_structuring_chars);
        if truncated {
            warnings.push(format!(
                "The CV text was longer than {} characters; only the beginning was analysed.",
                self.settings.max_structuring_chars
            ));
        }

        let raw = structure_text(
            self.llm.as_ref(),
            &text,
            &self.settings.structuring_model,
            self.settings.structuring_max_tokens,
        )
        .await
        .map_err(|e| PipelineError::UpstreamService(e.to_string()))?;

        let recovered =
            recover_record(&raw).map_err(|e| PipelineError::StructuringParse(e.to_string()))?;
        if recovered.record.is_empty() {
            return Err(PipelineError::InsufficientContent(NOTHING_EXTRACTED.to_string()));
        }
        if recovered.provenance == Provenance::RegexFallback {
            warnings.push(
                "The AI response was malformed; only basic contact details and skills were recovered."
                    .to_string(),
            );
        }

        let confidence_score = compute_confidence_score(&recovered.record);
        let completeness_report = compute_completeness_report(&recovered.record);

        let enriched = enrich_profile(
            self.llm.as_ref(),
            &recovered.record,
            BioOptions {
                enabled: self.settings.generate_bio,
                model: self.settings.bio_model(),
                max_tokens: self.settings.bio_max_tokens,
            },
        )
        .await;
        warnings.extend(enriched.warnings);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            confidence_score,
            completeness = completeness_report.overall_completeness,
            elapsed_ms,
            "CV processed"
        );

        Ok(ExtractionOutcome {
            record: enriched.record,
            confidence_score,
            completeness_report,
            provenance: recovered.provenance,
            metadata: ExtractionMetadata {
                extraction_id: Uuid::new_v4(),
                filename: filename.to_string(),
                media_type: media_type.to_string(),
                branch,
                strategy,
                extracted_chars,
                truncated,
                failed_attempts: extracted.skipped,
                bio_generated: enriched.bio_generated,
                elapsed_ms,
                processed_at: Utc::now(),
            },
            warnings,
        })
    }
}

/// Maps a fully failed chain to the branch's terminal error.
fn exhausted_error(branch: MediaBranch, failure: &ChainFailure) -> PipelineError {
    warn!(branch = branch.as_str(), attempts = %failure.summary(), "All extraction strategies failed");

    match branch {
        MediaBranch::Word => PipelineError::ExtractionExhausted(WORD_UNREADABLE.to_string()),
        MediaBranch::Pdf => PipelineError::ExtractionExhausted(PDF_UNSUPPORTED.to_string()),
        MediaBranch::Image => match failure.last_error() {
            Some(StrategyError::Upstream(e)) => PipelineError::UpstreamService(e.to_string()),
            _ => PipelineError::ExtractionExhausted(IMAGE_UNREADABLE.to_string()),
        },
        MediaBranch::PlainText => match failure.last_error() {
            Some(StrategyError::Empty) => {
                PipelineError::ExtractionExhausted("The file contains no text.".to_string())
            }
            _ => PipelineError::ExtractionExhausted(
                "The file is not readable UTF-8 text; save it as UTF-8 or upload a PDF.".to_string(),
            ),
        },
        MediaBranch::Unsupported => PipelineError::UnsupportedMediaType(branch.as_str().to_string()),
    }
}
