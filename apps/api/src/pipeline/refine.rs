//! Refinement stage — rewrites the resume per the analysis report's
//! recommendations. The output is the revised Markdown document, returned
//! verbatim; it is the terminal pipeline artifact and never re-consumed.

use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::ModelInvoker;
use crate::models::keywords::{JobKeywords, ResumeKeywords};
use crate::pipeline::json_pretty;
use crate::pipeline::prompts::REFINEMENT_PROMPT_TEMPLATE;

fn build_prompt(
    jd_text: &str,
    job_keywords: &JobKeywords,
    resume_text: &str,
    resume_keywords: &ResumeKeywords,
    analysis_report: &str,
) -> String {
    REFINEMENT_PROMPT_TEMPLATE
        .replace("{jd_text}", jd_text)
        .replace("{job_keywords}", &json_pretty(job_keywords))
        .replace("{resume_text}", resume_text)
        .replace("{resume_keywords}", &json_pretty(resume_keywords))
        .replace("{analysis_report}", analysis_report)
}

/// Runs the refinement stage against all prior pipeline artifacts.
pub async fn refine_resume(
    invoker: &dyn ModelInvoker,
    jd_text: &str,
    job_keywords: &JobKeywords,
    resume_text: &str,
    resume_keywords: &ResumeKeywords,
    analysis_report: &str,
) -> Result<String, AppError> {
    let prompt = build_prompt(
        jd_text,
        job_keywords,
        resume_text,
        resume_keywords,
        analysis_report,
    );
    debug!("running refinement stage ({} prompt chars)", prompt.len());

    let refined = invoker.invoke(&prompt).await.into_stage_text("refinement")?;

    if refined.trim().is_empty() {
        return Err(AppError::Generation(
            "refinement stage returned an empty document".to_string(),
        ));
    }

    Ok(refined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::RemoteCallResult;
    use crate::pipeline::testing::ScriptedInvoker;

    fn fixtures() -> (JobKeywords, ResumeKeywords) {
        let job = JobKeywords {
            job_title: Some("Backend Engineer".to_string()),
            extracted_hard_skills: vec!["Node.js".to_string()],
            ..Default::default()
        };
        let resume = ResumeKeywords {
            skills: vec!["Node.js".to_string(), "TypeScript".to_string()],
            ..Default::default()
        };
        (job, resume)
    }

    #[test]
    fn test_prompt_embeds_all_five_artifacts() {
        let (job, resume) = fixtures();
        let prompt = build_prompt("THE-JD", &job, "THE-RESUME", &resume, "THE-REPORT");
        assert!(prompt.contains("THE-JD"));
        assert!(prompt.contains("THE-RESUME"));
        assert!(prompt.contains("THE-REPORT"));
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("TypeScript"));
    }

    #[test]
    fn test_prompt_demands_resume_only_output() {
        let (job, resume) = fixtures();
        let prompt = build_prompt("jd", &job, "resume", &resume, "report");
        assert!(prompt.contains("ONLY output the final, improved resume"));
        assert!(prompt.contains("DO NOT include explanations or commentary"));
    }

    #[tokio::test]
    async fn test_refined_document_returned_verbatim() {
        let (job, resume) = fixtures();
        let invoker = ScriptedInvoker::succeeding(&["# Jane Doe\n\nRefined resume body"]);
        let refined = refine_resume(&invoker, "jd", &job, "resume", &resume, "report")
            .await
            .unwrap();
        assert_eq!(refined, "# Jane Doe\n\nRefined resume body");
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_surfaces_stage_name() {
        let (job, resume) = fixtures();
        let invoker = ScriptedInvoker::new(vec![RemoteCallResult::TransientFailure(
            "generation API returned 503".to_string(),
        )]);
        let err = refine_resume(&invoker, "jd", &job, "resume", &resume, "report")
            .await
            .unwrap_err();
        match err {
            AppError::TransientRemote(message) => assert!(message.contains("refinement")),
            other => panic!("expected TransientRemote, got {other:?}"),
        }
    }
}
