//! Ollama chat provider (`/api/chat`, non-streaming).
//!
//! Ollama has no way to force a specific tool call, so a forced
//! `function_call` is advisory here: the function definitions are offered
//! as tools and the reply's first tool call is mapped back. Ollama returns
//! tool arguments as a JSON value, which gets re-serialized to the raw
//! string contract of [`FunctionCall`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, FunctionCall, ProviderError,
    ProviderResult,
};

const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: OllamaChatMessage,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Option<Vec<OllamaToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OllamaToolCall {
    function: OllamaToolCallFunction,
}

#[derive(Debug, Deserialize)]
struct OllamaToolCallFunction {
    name: String,
    arguments: Value,
}

impl OllamaProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap OpenAI-style function definitions in Ollama's tool envelope.
fn to_tools(functions: Option<Vec<Value>>) -> Option<Vec<Value>> {
    functions.map(|defs| {
        defs.into_iter()
            .map(|def| serde_json::json!({"type": "function", "function": def}))
            .collect()
    })
}

fn normalize(wire: OllamaChatResponse) -> ProviderResult<ChatResponse> {
    let function_call = match wire.message.tool_calls {
        Some(calls) => match calls.into_iter().next() {
            Some(call) => {
                let arguments = serde_json::to_string(&call.function.arguments)
                    .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
                Some(FunctionCall {
                    name: call.function.name,
                    arguments,
                })
            }
            None => None,
        },
        None => None,
    };

    Ok(ChatResponse {
        content: wire.message.content,
        function_call,
        model: wire.model,
        provider: "ollama".to_string(),
        prompt_tokens: wire.prompt_eval_count,
        completion_tokens: wire.eval_count,
    })
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    async fn complete(&self, req: ChatRequest) -> ProviderResult<ChatResponse> {
        let options = if req.temperature.is_some() || req.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: req.temperature,
                num_predict: req.max_tokens,
            })
        } else {
            None
        };

        let wire_req = OllamaChatRequest {
            model: req.model,
            messages: req.messages,
            stream: false,
            tools: to_tools(req.functions),
            options,
        };

        let response = self
            .client
            .post(self.api_url())
            .json(&wire_req)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(error_text));
        }

        let wire: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let normalized = normalize(wire)?;
        tracing::debug!(
            provider = "ollama",
            model = %normalized.model,
            prompt_tokens = normalized.prompt_tokens,
            completion_tokens = normalized.completion_tokens,
            "chat completion finished"
        );
        Ok(normalized)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_url_joins_base() {
        let provider = OllamaProvider::new().with_base_url("http://models.internal:11434/");
        assert_eq!(provider.api_url(), "http://models.internal:11434/api/chat");
    }

    #[test]
    fn tools_are_wrapped_in_function_envelope() {
        let tools = to_tools(Some(vec![json!({"name": "route", "parameters": {}})])).unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["type"], "function");
        assert_eq!(tools[0]["function"]["name"], "route");

        assert!(to_tools(None).is_none());
    }

    #[test]
    fn request_is_non_streaming() {
        let req = OllamaChatRequest {
            model: "llama3.1:8b".into(),
            messages: vec![ChatMessage::user("hello")],
            stream: false,
            tools: None,
            options: Some(OllamaOptions {
                temperature: Some(0.5),
                num_predict: None,
            }),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stream"], json!(false));
        assert_eq!(json["options"]["temperature"], json!(0.5));
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn normalize_reserializes_tool_arguments() {
        let wire: OllamaChatResponse = serde_json::from_value(json!({
            "model": "llama3.1:8b",
            "message": {
                "content": "",
                "tool_calls": [{
                    "function": {"name": "route", "arguments": {"next": "Scout"}}
                }]
            },
            "prompt_eval_count": 200,
            "eval_count": 12
        }))
        .unwrap();

        let resp = normalize(wire).unwrap();
        let call = resp.function_call.unwrap();
        assert_eq!(call.name, "route");
        // Raw-string contract: arguments arrive as JSON text.
        let parsed: Value = serde_json::from_str(&call.arguments).unwrap();
        assert_eq!(parsed["next"], "Scout");
        assert_eq!(resp.prompt_tokens, Some(200));
        assert_eq!(resp.completion_tokens, Some(12));
    }

    #[test]
    fn normalize_plain_reply() {
        let wire: OllamaChatResponse = serde_json::from_value(json!({
            "model": "llama3.1:70b",
            "message": {"content": "The river is fordable."}
        }))
        .unwrap();

        let resp = normalize(wire).unwrap();
        assert_eq!(resp.content, "The river is fordable.");
        assert!(resp.function_call.is_none());
    }
}
