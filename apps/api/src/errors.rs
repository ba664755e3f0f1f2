use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Caller-input faults map to 400; extraction/generation/internal faults map
/// to 500. Full detail is logged server-side; the client payload is the
/// `{ "error": ..., "details": ... }` shape and never carries stack traces.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Remote output failed schema parsing. `raw` preserves the model's
    /// original text verbatim for diagnostics.
    #[error("Extraction error: {message}")]
    Extraction {
        message: String,
        raw: Option<String>,
    },

    /// Remote call blocked or failed for a pipeline stage. The message names
    /// the failing stage.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Rate limit or remote internal fault, still failing after the single
    /// internal retry.
    #[error("Transient remote error: {0}")]
    TransientRemote(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Unsupported file type: {msg}. Use PDF, DOCX, or TXT."),
                None,
            ),
            AppError::Extraction { message, raw } => {
                tracing::error!("Extraction error: {message}; raw output: {raw:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, message, raw)
            }
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
            AppError::TransientRemote(msg) => {
                tracing::error!("Transient remote error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The generation service is temporarily unavailable. Please retry.".to_string(),
                    Some(msg),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let body = match details {
            Some(details) => Json(json!({ "error": message, "details": details })),
            None => Json(json!({ "error": message })),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("Resume text too long".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unsupported_format_maps_to_400() {
        let response = AppError::UnsupportedFormat(".exe".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_extraction_maps_to_500() {
        let response = AppError::Extraction {
            message: "Failed to parse API response for keywords".to_string(),
            raw: Some("not json".to_string()),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_transient_remote_maps_to_500() {
        let response = AppError::TransientRemote("rate limited".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
