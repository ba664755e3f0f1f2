//! Request orchestrator — validates inputs, then sequences the three stages:
//! extract → analyze → refine. Stages are strictly ordered by data
//! dependency and any failure short-circuits the rest. Validation failures
//! never reach the remote client.

use serde::Serialize;
use tracing::info;

use crate::documents::RawDocument;
use crate::errors::AppError;
use crate::llm_client::ModelInvoker;
use crate::models::keywords::{JobKeywords, ResumeKeywords};
use crate::pipeline::analyze::generate_analysis;
use crate::pipeline::extract::{extract_keywords, ExtractionMode};
use crate::pipeline::refine::refine_resume;

/// Per-deployment pipeline choices, derived from `Config` at startup.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub extraction_mode: ExtractionMode,
    /// Two-stage deployments stop after the analysis report.
    pub include_refinement: bool,
    /// Per-document character cap, enforced before any remote call.
    pub max_text_chars: usize,
}

/// The response bundle. `refined_resume` is present only in three-stage
/// deployments.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub job_keywords: JobKeywords,
    pub resume_keywords: ResumeKeywords,
    pub analysis_report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refined_resume: Option<String>,
}

fn validate(options: &PipelineOptions, jd: &RawDocument, resume: &RawDocument) -> Result<(), AppError> {
    if resume.is_empty() {
        return Err(AppError::Validation(
            "Resume contains no extractable text".to_string(),
        ));
    }
    if jd.is_empty() {
        return Err(AppError::Validation(
            "Job description contains no text".to_string(),
        ));
    }
    if resume.len_chars() > options.max_text_chars {
        return Err(AppError::Validation("Resume text too long".to_string()));
    }
    if jd.len_chars() > options.max_text_chars {
        return Err(AppError::Validation(
            "Job description too long".to_string(),
        ));
    }
    Ok(())
}

/// Runs the full pipeline for one request.
pub async fn run_pipeline(
    invoker: &dyn ModelInvoker,
    options: &PipelineOptions,
    jd: &RawDocument,
    resume: &RawDocument,
) -> Result<PipelineOutput, AppError> {
    validate(options, jd, resume)?;

    info!(
        "pipeline start: jd={} chars ({:?}), resume={} chars ({:?}), mode={:?}",
        jd.len_chars(),
        jd.source_kind,
        resume.len_chars(),
        resume.source_kind,
        options.extraction_mode
    );

    let extracted = extract_keywords(
        invoker,
        options.extraction_mode,
        &jd.content,
        &resume.content,
    )
    .await?;

    let analysis_report = generate_analysis(
        invoker,
        &jd.content,
        &resume.content,
        Some(&extracted.job),
        Some(&extracted.resume),
    )
    .await?;

    let refined_resume = if options.include_refinement {
        Some(
            refine_resume(
                invoker,
                &jd.content,
                &extracted.job,
                &resume.content,
                &extracted.resume,
                &analysis_report,
            )
            .await?,
        )
    } else {
        None
    };

    info!("pipeline complete");

    Ok(PipelineOutput {
        job_keywords: extracted.job,
        resume_keywords: extracted.resume,
        analysis_report,
        refined_resume,
    })
}
