//! Structured extraction — turns raw document text into schema-validated
//! keyword records via the remote model.
//!
//! Two call strategies exist behind one interface: `Combined` sends both
//! documents in a single prompt, `Split` sends one prompt per document. The
//! parse path is shared, so the variants cannot drift apart.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::ModelInvoker;
use crate::models::keywords::{JobKeywords, ResumeKeywords};
use crate::pipeline::prompts::{
    COMBINED_EXTRACTION_PROMPT, JOB_EXTRACTION_PROMPT, RESUME_EXTRACTION_PROMPT,
};

/// Call-count strategy for the extraction stage, chosen by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// One call covering both documents, keyed `job_keywords` / `resume_keywords`.
    Combined,
    /// One call per document.
    Split,
}

impl FromStr for ExtractionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combined" => Ok(ExtractionMode::Combined),
            "split" => Ok(ExtractionMode::Split),
            other => anyhow::bail!("unknown extraction mode: {other}"),
        }
    }
}

/// How the model's output failed to meet the schema. `raw` always preserves
/// the original returned text verbatim for diagnostics.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to parse API response for keywords: output is not valid JSON")]
    MalformedJson { raw: String },

    #[error("Failed to parse API response for keywords: {detail}")]
    UnexpectedType { detail: String, raw: String },

    #[error("API output missing required keys (found: {keys_found:?})")]
    MissingFields {
        keys_found: Vec<String>,
        raw: String,
    },
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        let message = err.to_string();
        let raw = match err {
            ExtractionError::MalformedJson { raw }
            | ExtractionError::UnexpectedType { raw, .. }
            | ExtractionError::MissingFields { raw, .. } => raw,
        };
        AppError::Extraction {
            message,
            raw: Some(raw),
        }
    }
}

/// Both keyword records from one extraction stage.
#[derive(Debug, Clone)]
pub struct ExtractedKeywords {
    pub job: JobKeywords,
    pub resume: ResumeKeywords,
}

/// Strips a leading ```json / ``` fence and a trailing ``` fence, if present.
/// Pure and library-agnostic; the actual parse happens in the caller.
pub fn strip_code_fences(text: &str) -> &str {
    let mut out = text.trim();
    for prefix in ["```json", "```"] {
        if let Some(rest) = out.strip_prefix(prefix) {
            out = rest.trim_start();
            break;
        }
    }
    if let Some(rest) = out.strip_suffix("```") {
        out = rest.trim_end();
    }
    out
}

/// Two-attempt salvage parse: direct, then with code fences stripped.
/// Any remaining failure is `MalformedJson` carrying the untouched raw text.
pub fn parse_json_lenient(raw: &str) -> Result<Value, ExtractionError> {
    serde_json::from_str(raw).or_else(|_| {
        serde_json::from_str(strip_code_fences(raw)).map_err(|_| ExtractionError::MalformedJson {
            raw: raw.to_string(),
        })
    })
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    match parse_json_lenient(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(ExtractionError::UnexpectedType {
            detail: format!("expected a JSON object, got {}", json_type_name(&other)),
            raw: raw.to_string(),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn typed_from_value<T: DeserializeOwned>(
    value: Value,
    raw: &str,
    what: &str,
) -> Result<T, ExtractionError> {
    serde_json::from_value(value).map_err(|e| ExtractionError::UnexpectedType {
        detail: format!("{what} does not match the schema: {e}"),
        raw: raw.to_string(),
    })
}

/// Runs the extraction stage. The mode only changes how many prompts are
/// sent; parsing and validation are identical either way.
pub async fn extract_keywords(
    invoker: &dyn ModelInvoker,
    mode: ExtractionMode,
    jd_text: &str,
    resume_text: &str,
) -> Result<ExtractedKeywords, AppError> {
    debug!("running {mode:?} keyword extraction");
    match mode {
        ExtractionMode::Combined => {
            let prompt = COMBINED_EXTRACTION_PROMPT
                .replace("{jd_text}", jd_text)
                .replace("{resume_text}", resume_text);
            let raw = invoker.invoke(&prompt).await.into_stage_text("extraction")?;
            let mut object = parse_object(&raw)?;
            let keys_found: Vec<String> = object.keys().cloned().collect();

            let (Some(job_value), Some(resume_value)) = (
                object.remove("job_keywords"),
                object.remove("resume_keywords"),
            ) else {
                return Err(ExtractionError::MissingFields { keys_found, raw }.into());
            };

            Ok(ExtractedKeywords {
                job: typed_from_value(job_value, &raw, "job_keywords")?,
                resume: typed_from_value(resume_value, &raw, "resume_keywords")?,
            })
        }
        ExtractionMode::Split => {
            let job_raw = invoker
                .invoke(&JOB_EXTRACTION_PROMPT.replace("{jd_text}", jd_text))
                .await
                .into_stage_text("extraction")?;
            let job = typed_from_value(
                Value::Object(parse_object(&job_raw)?),
                &job_raw,
                "job_keywords",
            )?;

            let resume_raw = invoker
                .invoke(&RESUME_EXTRACTION_PROMPT.replace("{resume_text}", resume_text))
                .await
                .into_stage_text("extraction")?;
            let resume = typed_from_value(
                Value::Object(parse_object(&resume_raw)?),
                &resume_raw,
                "resume_keywords",
            )?;

            Ok(ExtractedKeywords { job, resume })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::RemoteCallResult;
    use crate::pipeline::testing::ScriptedInvoker;

    const COMBINED_OUTPUT: &str = r#"{
        "job_keywords": {
            "jobTitle": "Backend Engineer",
            "companyName": "Acme",
            "location": "Remote",
            "remoteStatus": "remote",
            "extractedHardSkills": ["Node.js"]
        },
        "resume_keywords": {
            "personalInfo": {"name": "Jane Doe", "email": "jane@example.com"},
            "skills": ["Node.js"]
        }
    }"#;

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_unterminated_fence() {
        let input = "```json\n{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_lenient_parse_fenced_equals_unfenced() {
        let plain = parse_json_lenient(r#"{"a": 1}"#).unwrap();
        let fenced = parse_json_lenient("```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(plain, fenced);
    }

    #[test]
    fn test_lenient_parse_malformed_preserves_raw_verbatim() {
        let raw = "Sorry, I cannot produce JSON today.";
        let err = parse_json_lenient(raw).unwrap_err();
        match err {
            ExtractionError::MalformedJson { raw: preserved } => assert_eq!(preserved, raw),
            other => panic!("expected MalformedJson, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_object_rejects_array_top_level() {
        let err = parse_object(r#"[1, 2, 3]"#).unwrap_err();
        match err {
            ExtractionError::UnexpectedType { detail, .. } => {
                assert!(detail.contains("array"));
            }
            other => panic!("expected UnexpectedType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_combined_extraction_parses_both_records() {
        let invoker = ScriptedInvoker::succeeding(&[COMBINED_OUTPUT]);
        let extracted = extract_keywords(
            &invoker,
            ExtractionMode::Combined,
            "Seeking backend engineer, Node.js required",
            "Jane Doe, Software Engineer, 5 years Node.js",
        )
        .await
        .unwrap();

        assert_eq!(invoker.call_count(), 1);
        assert_eq!(extracted.job.extracted_hard_skills, vec!["Node.js"]);
        assert_eq!(extracted.resume.skills, vec!["Node.js"]);
        assert_eq!(
            extracted.resume.personal_info.name.as_deref(),
            Some("Jane Doe")
        );
    }

    #[tokio::test]
    async fn test_combined_extraction_embeds_both_documents_in_prompt() {
        let invoker = ScriptedInvoker::succeeding(&[COMBINED_OUTPUT]);
        extract_keywords(&invoker, ExtractionMode::Combined, "THE-JD", "THE-RESUME")
            .await
            .unwrap();
        let prompt = invoker.prompt(0);
        assert!(prompt.contains("THE-JD"));
        assert!(prompt.contains("THE-RESUME"));
    }

    #[tokio::test]
    async fn test_combined_extraction_accepts_fenced_output() {
        let fenced = format!("```json\n{COMBINED_OUTPUT}\n```");
        let invoker = ScriptedInvoker::succeeding(&[fenced.as_str()]);
        let extracted = extract_keywords(&invoker, ExtractionMode::Combined, "jd", "resume")
            .await
            .unwrap();
        assert_eq!(extracted.job.job_title.as_deref(), Some("Backend Engineer"));
    }

    #[tokio::test]
    async fn test_combined_extraction_missing_key_names_found_keys() {
        let invoker =
            ScriptedInvoker::succeeding(&[r#"{"job_keywords": {}, "something_else": {}}"#]);
        let err = extract_keywords(&invoker, ExtractionMode::Combined, "jd", "resume")
            .await
            .unwrap_err();
        match err {
            AppError::Extraction { message, raw } => {
                assert!(message.contains("job_keywords"));
                assert!(message.contains("something_else"));
                assert!(raw.is_some());
            }
            other => panic!("expected Extraction error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_combined_extraction_malformed_output_carries_raw_details() {
        let invoker = ScriptedInvoker::succeeding(&["not json at all"]);
        let err = extract_keywords(&invoker, ExtractionMode::Combined, "jd", "resume")
            .await
            .unwrap_err();
        match err {
            AppError::Extraction { raw, .. } => {
                assert_eq!(raw.as_deref(), Some("not json at all"));
            }
            other => panic!("expected Extraction error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_split_extraction_makes_two_calls() {
        let invoker = ScriptedInvoker::succeeding(&[
            r#"{"jobTitle": "Backend Engineer", "extractedHardSkills": ["Node.js"]}"#,
            r#"{"personalInfo": {"name": "Jane Doe"}, "skills": ["Node.js"]}"#,
        ]);
        let extracted = extract_keywords(&invoker, ExtractionMode::Split, "THE-JD", "THE-RESUME")
            .await
            .unwrap();

        assert_eq!(invoker.call_count(), 2);
        assert!(invoker.prompt(0).contains("THE-JD"));
        assert!(invoker.prompt(1).contains("THE-RESUME"));
        assert_eq!(extracted.job.job_title.as_deref(), Some("Backend Engineer"));
        assert_eq!(extracted.resume.skills, vec!["Node.js"]);
    }

    #[tokio::test]
    async fn test_split_extraction_stops_after_first_failure() {
        let invoker = ScriptedInvoker::new(vec![RemoteCallResult::FatalFailure(
            "boom".to_string(),
        )]);
        let err = extract_keywords(&invoker, ExtractionMode::Split, "jd", "resume")
            .await
            .unwrap_err();
        assert_eq!(invoker.call_count(), 1);
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn test_extraction_mode_from_str() {
        assert_eq!(
            "combined".parse::<ExtractionMode>().unwrap(),
            ExtractionMode::Combined
        );
        assert_eq!(
            "Split".parse::<ExtractionMode>().unwrap(),
            ExtractionMode::Split
        );
        assert!("both".parse::<ExtractionMode>().is_err());
    }
}
