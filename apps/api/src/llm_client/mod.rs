//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the generation API directly.
//! All LLM interactions MUST go through this module.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Tagged outcome of one call to the generation API. Callers branch on
/// structure, never on string prefixes.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCallResult {
    /// The model returned usable text.
    Success(String),
    /// Generation was refused by the content-safety policy. Terminal for the
    /// stage — never retried.
    Blocked {
        reason: String,
        safety_ratings: Vec<String>,
    },
    /// Rate limit or remote internal fault. The client has already spent its
    /// single internal retry by the time callers see this.
    TransientFailure(String),
    /// Anything else: transport errors, auth failures, unreadable content.
    FatalFailure(String),
}

impl RemoteCallResult {
    /// Unwraps the success text, converting error outcomes into the
    /// application error for the named pipeline stage.
    pub fn into_stage_text(self, stage: &str) -> Result<String, crate::errors::AppError> {
        use crate::errors::AppError;
        match self {
            RemoteCallResult::Success(text) => Ok(text),
            RemoteCallResult::Blocked {
                reason,
                safety_ratings,
            } => Err(AppError::Generation(format!(
                "{stage} stage blocked by content policy: {reason} (safety ratings: {safety_ratings:?})"
            ))),
            RemoteCallResult::TransientFailure(detail) => Err(AppError::TransientRemote(format!(
                "{stage} stage: {detail}"
            ))),
            RemoteCallResult::FatalFailure(detail) => Err(AppError::Generation(format!(
                "{stage} stage failed: {detail}"
            ))),
        }
    }
}

/// The seam between the pipeline and the network. `AppState` carries an
/// `Arc<dyn ModelInvoker>` so tests inject fakes with canned transcripts.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, prompt: &str) -> RemoteCallResult;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (generateContent request/response)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
    #[serde(default)]
    safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Deserialize)]
struct SafetyRating {
    category: Option<String>,
    probability: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts, or `None` when the
    /// response carries no usable content.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn block_diagnostics(&self) -> (String, Vec<String>) {
        match &self.prompt_feedback {
            Some(feedback) => {
                let reason = feedback
                    .block_reason
                    .clone()
                    .unwrap_or_else(|| "unspecified".to_string());
                let ratings = feedback
                    .safety_ratings
                    .iter()
                    .map(|r| {
                        format!(
                            "{}={}",
                            r.category.as_deref().unwrap_or("unknown"),
                            r.probability.as_deref().unwrap_or("unknown")
                        )
                    })
                    .collect();
                (reason, ratings)
            }
            None => ("unspecified".to_string(), Vec::new()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Retry policy
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of a single round-trip before the retry policy is applied.
/// `RateLimited` is the only retryable state.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Attempt {
    Done(RemoteCallResult),
    RateLimited(String),
}

/// Runs `attempt` and, on a rate-limit signal, waits `backoff` and runs it
/// exactly once more. A second rate-limit signal is terminal — there is
/// never a third attempt.
pub(crate) async fn with_rate_limit_retry<F, Fut>(backoff: Duration, attempt: F) -> RemoteCallResult
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Attempt>,
{
    match attempt().await {
        Attempt::Done(result) => result,
        Attempt::RateLimited(detail) => {
            warn!(
                "generation API rate limited, retrying once after {}s: {detail}",
                backoff.as_secs()
            );
            tokio::time::sleep(backoff).await;
            match attempt().await {
                Attempt::Done(result) => result,
                Attempt::RateLimited(detail) => RemoteCallResult::TransientFailure(format!(
                    "rate limited on retry: {detail}"
                )),
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single Gemini client used by the whole pipeline.
/// Wraps the generateContent endpoint with the rate-limit retry policy and
/// block/fault classification.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    retry_backoff: Duration,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, retry_backoff: Duration) -> Self {
        Self {
            client: Client::builder()
                // A stalled remote call must not hold the request task forever.
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
            retry_backoff,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One round-trip to generateContent, classified but not yet retried.
    async fn attempt(&self, prompt: &str) -> Attempt {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);

        let response = match self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return Attempt::Done(RemoteCallResult::FatalFailure(format!(
                    "HTTP error calling generation API: {e}"
                )))
            }
        };

        let status = response.status();

        if status.as_u16() == 429 {
            let body = response.text().await.unwrap_or_default();
            return Attempt::RateLimited(body);
        }

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generation API returned {status}: {body}");
            return Attempt::Done(RemoteCallResult::TransientFailure(format!(
                "generation API returned {status}"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Attempt::Done(RemoteCallResult::FatalFailure(format!(
                "generation API returned {status}: {message}"
            )));
        }

        let parsed: GenerateContentResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                return Attempt::Done(RemoteCallResult::FatalFailure(format!(
                    "unreadable generation API response: {e}"
                )))
            }
        };

        match parsed.text() {
            Some(text) => {
                debug!("generation API call succeeded ({} chars)", text.len());
                Attempt::Done(RemoteCallResult::Success(text))
            }
            None => {
                let (reason, safety_ratings) = parsed.block_diagnostics();
                Attempt::Done(RemoteCallResult::Blocked {
                    reason,
                    safety_ratings,
                })
            }
        }
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    async fn invoke(&self, prompt: &str) -> RemoteCallResult {
        with_rate_limit_retry(self.retry_backoff, || self.attempt(prompt)).await
    }
}
