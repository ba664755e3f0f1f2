// Analysis pipeline: keyword extraction, scored report generation, resume
// refinement, and the orchestrator that sequences them.
// All LLM calls go through llm_client — no direct Gemini API calls here.

pub mod analyze;
pub mod extract;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod refine;

#[cfg(test)]
pub mod testing;

/// Pretty-prints a keyword record for prompt embedding. Falls back to Debug
/// formatting rather than failing a stage over a display concern.
pub(crate) fn json_pretty<T: serde::Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
}
