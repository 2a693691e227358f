//! OpenAI-compatible chat-completions provider.
//!
//! Works against the official endpoint or any server speaking the same
//! dialect, including the legacy function-calling fields the routing agent
//! relies on (`functions` + `function_call` forcing).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, FunctionCall, ProviderError,
    ProviderResult,
};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Clone)]
pub struct OpenAiCompatProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<OpenAiFunctionChoice>,
}

#[derive(Debug, Serialize)]
struct OpenAiFunctionChoice {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    // Null when the model answers with a function call instead of text.
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    function_call: Option<OpenAiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl OpenAiCompatProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Point at a different OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self) -> String {
        if self.base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.base_url)
        } else {
            format!("{}/v1/chat/completions", self.base_url)
        }
    }
}

fn normalize(wire: OpenAiResponse) -> ProviderResult<ChatResponse> {
    let usage = wire.usage;
    let choice = wire
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".into()))?;

    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        function_call: choice
            .message
            .function_call
            .map(|fc| FunctionCall {
                name: fc.name,
                arguments: fc.arguments,
            }),
        model: wire.model,
        provider: "openai-compatible".to_string(),
        prompt_tokens: usage.as_ref().map(|u| u.prompt_tokens),
        completion_tokens: usage.as_ref().map(|u| u.completion_tokens),
    })
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    async fn complete(&self, req: ChatRequest) -> ProviderResult<ChatResponse> {
        let wire_req = OpenAiRequest {
            model: req.model,
            messages: req.messages,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            functions: req.functions,
            function_call: req.function_call.map(|name| OpenAiFunctionChoice { name }),
        };

        let mut request = self.client.post(self.api_url()).json(&wire_req);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(error_text));
        }

        let wire: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let normalized = normalize(wire)?;
        tracing::debug!(
            provider = "openai-compatible",
            model = %normalized.model,
            prompt_tokens = normalized.prompt_tokens,
            completion_tokens = normalized.completion_tokens,
            "chat completion finished"
        );
        Ok(normalized)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}
