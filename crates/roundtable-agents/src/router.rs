//! The routing agent behind the supervisor node.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use roundtable_engine::{
    AgentContext, FunctionCallPayload, InvokeError, RouteInvoker, RouteReply, SupervisorPrompts,
    FINISH, ROUTE_FN,
};
use roundtable_providers::{ChatMessage, ChatProvider, ChatRequest};

use crate::invoke_error;

/// A [`RouteInvoker`] that decides through a forced function call.
///
/// The legal targets are fixed at construction: the terminal sentinel plus
/// the member names, baked into an enum-constrained schema so the model
/// can only answer with one of them. The reply's payload is passed through
/// untouched; decode policy belongs to the supervisor node.
pub struct RoutingAgent {
    provider: Arc<dyn ChatProvider>,
    model: String,
    prompts: SupervisorPrompts,
    options: Vec<String>,
    schema: Value,
    temperature: f32,
}

impl RoutingAgent {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        model: impl Into<String>,
        prompts: SupervisorPrompts,
        members: &[String],
    ) -> Self {
        let mut options = vec![FINISH.to_string()];
        options.extend(members.iter().cloned());
        let schema = route_schema(&options);
        Self {
            provider,
            model: model.into(),
            prompts,
            options,
            schema,
            // Routing should be as deterministic as the model allows.
            temperature: 0.0,
        }
    }

    /// The legal routing values, terminal sentinel first.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    fn render_messages(&self, context: &AgentContext) -> Vec<ChatMessage> {
        let decision = self
            .prompts
            .decision
            .replace("{options}", &self.options.join(", "));
        let mut messages = vec![ChatMessage::system(&self.prompts.initial)];
        for entry in &context.messages {
            messages.push(ChatMessage::user(entry));
        }
        messages.push(ChatMessage::system(decision));
        messages
    }
}

/// OpenAI-style function definition constraining `next` to the legal targets.
fn route_schema(options: &[String]) -> Value {
    json!({
        "name": ROUTE_FN,
        "description": "Select the next role to act.",
        "parameters": {
            "title": "routeSchema",
            "type": "object",
            "properties": {
                "next": {
                    "title": "Next",
                    "anyOf": [{"enum": options}],
                },
            },
            "required": ["next"],
        },
    })
}

#[async_trait]
impl RouteInvoker for RoutingAgent {
    async fn invoke(&self, context: &AgentContext) -> Result<RouteReply, InvokeError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: self.render_messages(context),
            temperature: Some(self.temperature),
            max_tokens: None,
            functions: Some(vec![self.schema.clone()]),
            function_call: Some(ROUTE_FN.to_string()),
        };
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(invoke_error)?;
        Ok(RouteReply {
            function_call: response.function_call.map(|fc| FunctionCallPayload {
                name: fc.name,
                arguments: fc.arguments,
            }),
        })
    }
}
