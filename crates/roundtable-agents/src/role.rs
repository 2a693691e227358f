//! Role agents: one LLM-backed persona per worker node.

use std::sync::Arc;

use async_trait::async_trait;

use roundtable_engine::{AgentContext, AgentInvoker, AgentReply, InvokeError, Role};
use roundtable_providers::{ChatMessage, ChatProvider, ChatRequest};

use crate::invoke_error;

const DEFAULT_TEMPERATURE: f32 = 0.3;

/// An [`AgentInvoker`] that plays one configured role.
///
/// The role prompt frames the shared conversation; the latest audit record
/// rides along as auxiliary context so the persona knows what just
/// happened without seeing the whole trail.
pub struct RoleAgent {
    provider: Arc<dyn ChatProvider>,
    model: String,
    role: Role,
    temperature: f32,
}

impl RoleAgent {
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>, role: Role) -> Self {
        Self {
            provider,
            model: model.into(),
            role,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn role_name(&self) -> &str {
        &self.role.name
    }

    fn render_messages(&self, context: &AgentContext) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(&self.role.prompt)];
        for entry in &context.messages {
            messages.push(ChatMessage::user(entry));
        }
        if let Some(tail) = &context.scratchpad_tail {
            messages.push(ChatMessage::system(format!(
                "Latest turn (step {}, {}): {}",
                tail.step, tail.agent, tail.output
            )));
        }
        messages
    }
}

#[async_trait]
impl AgentInvoker for RoleAgent {
    async fn invoke(&self, context: &AgentContext) -> Result<AgentReply, InvokeError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: self.render_messages(context),
            temperature: Some(self.temperature),
            max_tokens: None,
            functions: None,
            function_call: None,
        };
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(invoke_error)?;
        Ok(AgentReply {
            output: response.content,
        })
    }
}
