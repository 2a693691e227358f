//! Seams between the engine and the LLM-backed agents it drives.
//!
//! The engine never talks to a model directly. Workers go through
//! [`AgentInvoker`], the supervisor through [`RouteInvoker`]; both receive
//! the same restricted [`AgentContext`] view of the shared state. Concrete
//! implementations live outside this crate.

use async_trait::async_trait;

use crate::errors::InvokeError;
use crate::state::{ScratchpadEntry, SharedState};

/// Restricted view of [`SharedState`] handed to an agent for one turn: the
/// full message history, the single most recent audit record, and the
/// current round. Agents never see the full scratchpad.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub messages: Vec<String>,
    pub scratchpad_tail: Option<ScratchpadEntry>,
    pub step: u32,
}

impl AgentContext {
    /// Capture the view an agent gets for the current turn.
    pub fn snapshot(state: &SharedState) -> Self {
        Self {
            messages: state.messages.clone(),
            scratchpad_tail: state.latest_scratchpad().cloned(),
            step: state.step,
        }
    }
}

/// What a worker agent returns for its turn.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub output: String,
}

/// A role-playing agent bound to a worker node.
///
/// Invocation is blocking from the engine's point of view; a failure
/// aborts the whole run.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, context: &AgentContext) -> Result<AgentReply, InvokeError>;
}

/// Function-call-style payload carried back by a routing invocation.
/// `arguments` is the raw JSON text exactly as the provider produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCallPayload {
    pub name: String,
    pub arguments: String,
}

/// Outcome of one routing invocation. The reply may or may not carry a
/// decodable payload; decode policy belongs to the supervisor node.
#[derive(Debug, Clone, Default)]
pub struct RouteReply {
    pub function_call: Option<FunctionCallPayload>,
}

/// The routing agent behind the supervisor node.
#[async_trait]
pub trait RouteInvoker: Send + Sync {
    async fn invoke(&self, context: &AgentContext) -> Result<RouteReply, InvokeError>;
}
