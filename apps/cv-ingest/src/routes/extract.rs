use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::pipeline::ExtractionMetadata;
use crate::profile::{CompletenessReport, StructuredCVRecord};
use crate::state::AppState;
use crate::structuring::Provenance;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    /// Base64 file content, optionally as a `data:` URI.
    pub file_buffer: String,
    pub file_name: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    pub data: StructuredCVRecord,
    pub completeness_analysis: CompletenessReport,
    pub confidence_score: f64,
    pub provenance: Provenance,
    pub metadata: ExtractionMetadata,
    pub warnings: Vec<String>,
    pub filename: String,
}

/// POST /api/v1/cv/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    if req.file_name.trim().is_empty() {
        return Err(AppError::Validation("fileName must not be empty".to_string()));
    }

    let bytes = decode_file_buffer(&req.file_buffer)?;
    info!(
        filename = %req.file_name,
        media_type = %req.mime_type,
        bytes = bytes.len(),
        "CV upload received"
    );

    let outcome = state
        .pipeline
        .extract_and_parse(bytes, &req.file_name, &req.mime_type)
        .await?;

    Ok(Json(ExtractResponse {
        success: true,
        data: outcome.record,
        completeness_analysis: outcome.completeness_report,
        confidence_score: outcome.confidence_score,
        provenance: outcome.provenance,
        metadata: outcome.metadata,
        warnings: outcome.warnings,
        filename: req.file_name,
    }))
}

fn decode_file_buffer(encoded: &str) -> Result<Vec<u8>, AppError> {
    let encoded = encoded.trim();
    let encoded = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    if encoded.is_empty() {
        return Err(AppError::Validation("fileBuffer is empty".to_string()));
    }
    general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Validation(format!("fileBuffer is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_and_data_uri() {
        assert_eq!(decode_file_buffer("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_file_buffer("data:text/plain;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_decode_rejects_garbage_and_empty() {
        assert!(matches!(
            decode_file_buffer("not base64!!"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(decode_file_buffer("  "), Err(AppError::Validation(_))));
    }
}
