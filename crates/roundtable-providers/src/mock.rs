//! Scriptable in-memory provider for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::traits::{
    ChatProvider, ChatRequest, ChatResponse, FunctionCall, ProviderError, ProviderResult,
};

/// Returns queued responses in order and records every request it sees.
/// Running out of script is an error, not a panic, so a test that
/// over-consumes fails with a readable message.
#[derive(Debug, Default)]
pub struct MockChatProvider {
    script: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain-text reply.
    pub fn push_text(&self, content: impl Into<String>) {
        self.push_response(ChatResponse {
            content: content.into(),
            function_call: None,
            model: "mock".into(),
            provider: "mock".into(),
            prompt_tokens: None,
            completion_tokens: None,
        });
    }

    /// Queue a function-call reply.
    pub fn push_function_call(&self, name: impl Into<String>, arguments: impl Into<String>) {
        self.push_response(ChatResponse {
            content: String::new(),
            function_call: Some(FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            }),
            model: "mock".into(),
            provider: "mock".into(),
            prompt_tokens: None,
            completion_tokens: None,
        });
    }

    /// Queue a fully custom response.
    pub fn push_response(&self, response: ChatResponse) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Requests seen so far, in order.
    pub fn recorded(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, req: ChatRequest) -> ProviderResult<ChatResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(req);
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| ProviderError::ApiError("mock script exhausted".into()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
