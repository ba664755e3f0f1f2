//! Axum route handler for the analysis endpoint.
//!
//! Accepts multipart form data: a `resume` file plus either a `jd` file or a
//! `jd_text` form field. When both JD variants are supplied, the file wins.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::documents::{RawDocument, SourceKind};
use crate::errors::AppError;
use crate::pipeline::orchestrator::{run_pipeline, PipelineOutput};
use crate::state::AppState;

/// POST /analyze
///
/// Full pipeline: decode uploads → validate → extract → analyze → refine.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PipelineOutput>, AppError> {
    let mut resume: Option<RawDocument> = None;
    let mut jd_file: Option<RawDocument> = None;
    let mut jd_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let doc = read_file_field(field, "resume").await?;
                resume = Some(doc);
            }
            "jd" => {
                let doc = read_file_field(field, "jd").await?;
                jd_file = Some(doc);
            }
            "jd_text" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read jd_text field: {e}"))
                })?;
                jd_text = Some(text);
            }
            // unknown fields are ignored, matching lenient form handling
            _ => {}
        }
    }

    let resume =
        resume.ok_or_else(|| AppError::Validation("Please provide a resume file.".to_string()))?;

    let jd = match (jd_file, jd_text) {
        (Some(doc), _) => doc,
        (None, Some(text)) => RawDocument::from_text(text),
        (None, None) => {
            return Err(AppError::Validation(
                "Please provide a job description file or text.".to_string(),
            ))
        }
    };

    let output = run_pipeline(state.invoker.as_ref(), &state.pipeline, &jd, &resume).await?;

    Ok(Json(output))
}

async fn read_file_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<RawDocument, AppError> {
    let filename = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("Field '{name}' must be a file upload")))?;

    // Reject unsupported extensions before touching the payload.
    let kind = SourceKind::from_filename(&filename)?;

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;

    RawDocument::from_bytes(kind, &data)
}
