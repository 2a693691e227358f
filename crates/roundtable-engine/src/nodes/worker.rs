//! Worker node: one agent turn.
//!
//! A worker wraps a single role agent. It hands the agent the restricted
//! state view, appends the rendered contribution to the conversation, and
//! always routes control back to the supervisor. Workers cannot route to
//! each other.

use std::sync::Arc;

use crate::errors::EngineError;
use crate::state::{Destination, SharedState};
use crate::traits::{AgentContext, AgentInvoker};

/// Wraps one role agent under its registered name.
pub struct WorkerNode {
    name: String,
    agent: Arc<dyn AgentInvoker>,
}

impl WorkerNode {
    pub fn new(name: impl Into<String>, agent: Arc<dyn AgentInvoker>) -> Self {
        Self {
            name: name.into(),
            agent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one turn. An invocation failure aborts the run; there is no
    /// per-worker retry.
    pub async fn execute(&self, state: &mut SharedState) -> Result<(), EngineError> {
        tracing::info!(agent = %self.name, step = state.step, "worker turn");
        let context = AgentContext::snapshot(state);
        let reply = self
            .agent
            .invoke(&context)
            .await
            .map_err(|source| EngineError::AgentFailed {
                agent: self.name.clone(),
                source,
            })?;

        let rendered = format!("# Step {} - {}\n{}", state.step, self.name, reply.output);
        // Guard against duplicate emission when an agent repeats itself.
        state.append_message_if_new(rendered);
        state.record(self.name.clone(), reply.output);
        state.next = Destination::Supervisor;
        Ok(())
    }
}
