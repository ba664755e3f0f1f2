//! Analysis stage — produces the scored ResumeFit report comparing a resume
//! to a job description. The report is model-authored free text; locally it
//! is only checked for emptiness, never parsed.

use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::ModelInvoker;
use crate::models::keywords::{JobKeywords, ResumeKeywords};
use crate::pipeline::json_pretty;
use crate::pipeline::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};

fn build_prompt(
    jd_text: &str,
    resume_text: &str,
    job_keywords: Option<&JobKeywords>,
    resume_keywords: Option<&ResumeKeywords>,
) -> String {
    let mut keyword_context = String::new();
    if let Some(job) = job_keywords {
        keyword_context.push_str("\nExtracted Job Keywords:\n");
        keyword_context.push_str(&json_pretty(job));
        keyword_context.push('\n');
    }
    if let Some(resume) = resume_keywords {
        keyword_context.push_str("\nExtracted Resume Keywords:\n");
        keyword_context.push_str(&json_pretty(resume));
        keyword_context.push('\n');
    }

    let body = ANALYSIS_PROMPT_TEMPLATE
        .replace("{jd_text}", jd_text)
        .replace("{resume_text}", resume_text)
        .replace("{keyword_context}", &keyword_context);

    format!("{ANALYSIS_SYSTEM}\n\n{body}")
}

/// Runs the analysis stage. Keyword records are supplementary context — the
/// stage works without them, so a split deployment can reorder calls.
pub async fn generate_analysis(
    invoker: &dyn ModelInvoker,
    jd_text: &str,
    resume_text: &str,
    job_keywords: Option<&JobKeywords>,
    resume_keywords: Option<&ResumeKeywords>,
) -> Result<String, AppError> {
    let prompt = build_prompt(jd_text, resume_text, job_keywords, resume_keywords);
    debug!("running analysis stage ({} prompt chars)", prompt.len());

    let report = invoker.invoke(&prompt).await.into_stage_text("analysis")?;

    if report.trim().is_empty() {
        return Err(AppError::Generation(
            "analysis stage returned an empty report".to_string(),
        ));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::RemoteCallResult;
    use crate::pipeline::testing::ScriptedInvoker;

    #[test]
    fn test_prompt_embeds_rubric_and_documents() {
        let prompt = build_prompt("THE-JD", "THE-RESUME", None, None);
        assert!(prompt.contains("SKILLS & KEYWORD ALIGNMENT (45 pts)"));
        assert!(prompt.contains("EXPERIENCE ALIGNMENT (20 pts)"));
        assert!(prompt.contains("ATS & PRESENTATION (25 pts)"));
        assert!(prompt.contains("EDUCATION & CREDENTIALS (10 pts)"));
        assert!(prompt.contains("THE-JD"));
        assert!(prompt.contains("THE-RESUME"));
    }

    #[test]
    fn test_prompt_includes_keywords_when_available() {
        let job = JobKeywords {
            job_title: Some("Backend Engineer".to_string()),
            ..Default::default()
        };
        let resume = ResumeKeywords {
            skills: vec!["Node.js".to_string()],
            ..Default::default()
        };
        let prompt = build_prompt("jd", "resume", Some(&job), Some(&resume));
        assert!(prompt.contains("Extracted Job Keywords"));
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("Extracted Resume Keywords"));
        assert!(prompt.contains("Node.js"));
    }

    #[test]
    fn test_prompt_omits_keyword_sections_when_absent() {
        let prompt = build_prompt("jd", "resume", None, None);
        assert!(!prompt.contains("Extracted Job Keywords"));
        assert!(!prompt.contains("Extracted Resume Keywords"));
    }

    #[tokio::test]
    async fn test_report_returned_verbatim() {
        let report = "# RESUMEFIT ANALYSIS REPORT\n\n**OVERALL SCORE: 82/100**\n\n### 1. Skills & Keyword Alignment: 40/45\n* **Hard Skills & Technology: 27/30**";
        let invoker = ScriptedInvoker::succeeding(&[report]);
        let result = generate_analysis(&invoker, "jd", "resume", None, None)
            .await
            .unwrap();
        assert_eq!(result, report);
        // High skills-alignment sub-score surfaced exactly as authored.
        assert!(result.contains("Hard Skills & Technology: 27/30"));
    }

    #[tokio::test]
    async fn test_empty_report_is_a_stage_failure() {
        let invoker = ScriptedInvoker::succeeding(&["   \n"]);
        let err = generate_analysis(&invoker, "jd", "resume", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[tokio::test]
    async fn test_blocked_outcome_propagates_not_swallowed() {
        let invoker = ScriptedInvoker::new(vec![RemoteCallResult::Blocked {
            reason: "SAFETY".to_string(),
            safety_ratings: vec!["HARM_CATEGORY_DANGEROUS_CONTENT=HIGH".to_string()],
        }]);
        let err = generate_analysis(&invoker, "jd", "resume", None, None)
            .await
            .unwrap_err();
        match err {
            AppError::Generation(message) => {
                assert!(message.contains("analysis"));
                assert!(message.contains("SAFETY"));
            }
            other => panic!("expected Generation error, got {other:?}"),
        }
    }
}
