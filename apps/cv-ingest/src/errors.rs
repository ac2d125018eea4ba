use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Terminal failures of the ingestion pipeline.
///
/// Strategy-level failures never appear here individually; only the
/// terminal outcome of a chain does. Every message is meant to be shown to
/// the uploader as-is.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Configuration(String),

    #[error("Unsupported file type '{0}'. Upload a PDF, Word document, image, or plain text file.")]
    UnsupportedMediaType(String),

    #[error("File is {size} bytes, which exceeds the {limit}-byte limit. Upload a smaller file.")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("{0}")]
    ExtractionExhausted(String),

    #[error("The AI service could not process this CV: {0}")]
    UpstreamService(String),

    #[error("Could not parse AI response: {0}")]
    StructuringParse(String),

    #[error("{0}")]
    InsufficientContent(String),
}

impl PipelineError {
    /// Stable machine-readable name of the failure, used in response bodies.
    pub fn error_kind(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "ConfigurationError",
            PipelineError::UnsupportedMediaType(_) => "UnsupportedMediaTypeError",
            PipelineError::PayloadTooLarge { .. } => "PayloadTooLargeError",
            PipelineError::ExtractionExhausted(_) => "ExtractionExhaustedError",
            PipelineError::UpstreamService(_) => "UpstreamServiceError",
            PipelineError::StructuringParse(_) => "StructuringParseError",
            PipelineError::InsufficientContent(_) => "InsufficientContentError",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PipelineError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            PipelineError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PipelineError::ExtractionExhausted(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::UpstreamService(_) => StatusCode::BAD_GATEWAY,
            PipelineError::StructuringParse(_) => StatusCode::BAD_GATEWAY,
            PipelineError::InsufficientContent(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Transport-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "ValidationError", msg.clone()),
            AppError::Pipeline(e) => {
                match e {
                    PipelineError::Configuration(_) | PipelineError::UpstreamService(_) => {
                        tracing::error!("CV extraction failed: {e}");
                    }
                    _ => tracing::warn!("CV extraction rejected: {e}"),
                }
                (e.status_code(), e.error_kind(), e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "errorKind": kind,
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        let cases = [
            (PipelineError::Configuration("x".into()), "ConfigurationError"),
            (
                PipelineError::UnsupportedMediaType("x".into()),
                "UnsupportedMediaTypeError",
            ),
            (
                PipelineError::PayloadTooLarge { size: 2, limit: 1 },
                "PayloadTooLargeError",
            ),
            (
                PipelineError::ExtractionExhausted("x".into()),
                "ExtractionExhaustedError",
            ),
            (PipelineError::UpstreamService("x".into()), "UpstreamServiceError"),
            (PipelineError::StructuringParse("x".into()), "StructuringParseError"),
            (
                PipelineError::InsufficientContent("x".into()),
                "InsufficientContentError",
            ),
        ];
        for (error, kind) in cases {
            assert_eq!(error.error_kind(), kind);
        }
    }

    #[test]
    fn test_unsupported_message_names_media_type() {
        let error = PipelineError::UnsupportedMediaType("application/zip".into());
        assert!(error.to_string().contains("application/zip"));
        assert_eq!(error.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let response =
            AppError::from(PipelineError::PayloadTooLarge { size: 11, limit: 10 }).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("bad base64".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
