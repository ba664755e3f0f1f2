//! Test doubles for pipeline tests: a scripted `ModelInvoker` that replays a
//! canned transcript and records every prompt it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{ModelInvoker, RemoteCallResult};

pub struct ScriptedInvoker {
    responses: Mutex<VecDeque<RemoteCallResult>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInvoker {
    pub fn new(responses: Vec<RemoteCallResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Script where every call succeeds with the given texts, in order.
    pub fn succeeding(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| RemoteCallResult::Success(t.to_string()))
                .collect(),
        )
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(&self, prompt: &str) -> RemoteCallResult {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                RemoteCallResult::FatalFailure("scripted invoker exhausted".to_string())
            })
    }
}
