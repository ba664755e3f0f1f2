use std::sync::Arc;

use crate::llm_client::ModelInvoker;
use crate::pipeline::orchestrator::PipelineOptions;

/// Shared application state injected into route handlers via Axum extractors.
/// Read-only after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// The generation client behind the `ModelInvoker` seam. Production uses
    /// `GeminiClient`; tests inject scripted fakes.
    pub invoker: Arc<dyn ModelInvoker>,
    pub pipeline: PipelineOptions,
}
