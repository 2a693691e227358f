//! The chat-completion seam and its wire types.
//!
//! This crate's own abstraction, independent of the engine's invoker
//! traits: providers translate [`ChatRequest`] to their wire dialect, make
//! the call, and normalize the reply into [`ChatResponse`]. The agents
//! layer adapts these into the engine's seams.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("API error: {0}")]
    ApiError(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// One chat message on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

/// A chat-completion request.
///
/// `functions` carries OpenAI-style function definitions; `function_call`
/// names the function the model is forced to call. Both are `None` for
/// plain conversational turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<String>,
}

/// A function call the model chose to make. `arguments` is the raw JSON
/// text exactly as the provider returned it; decoding is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    pub model: String,
    pub provider: String,
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

/// Unified interface for chat-completion backends.
///
/// Implementations handle request translation, API communication, and
/// response normalization for a specific provider dialect.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a completion request and return the full response.
    async fn complete(&self, req: ChatRequest) -> ProviderResult<ChatResponse>;

    /// Provider name for diagnostics and routing (e.g. `"openai"`).
    fn name(&self) -> &str;
}
