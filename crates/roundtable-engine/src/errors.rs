//! Error types for configuration, graph construction, and scenario runs.

use thiserror::Error;

/// Error raised by an agent or routing invocation (the external LLM call).
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("request failed: {message}")]
    Request { message: String },
    #[error("invalid response: {message}")]
    Response { message: String },
}

/// Errors from loading or validating a scenario config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scenario config: {}", .issues.join("; "))]
    Invalid { issues: Vec<String> },
}

/// Errors from assembling a team graph.
#[derive(Debug, Error)]
pub enum GraphBuildError {
    #[error("agent name must not be empty")]
    EmptyAgentName,
    #[error("duplicate agent name: {name}")]
    DuplicateAgent { name: String },
    #[error("agent name '{name}' is reserved")]
    ReservedName { name: String },
    #[error("graph needs at least one agent")]
    NoAgents,
}

/// Fatal errors that abort a scenario run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The routing decision named a target the graph does not know.
    #[error("unknown routing target '{target}'; registered agents: {}", .registered.join(", "))]
    UnknownRoute {
        target: String,
        registered: Vec<String>,
    },
    /// A worker's agent invocation failed. There is no per-worker retry.
    #[error("agent '{agent}' failed: {source}")]
    AgentFailed {
        agent: String,
        #[source]
        source: InvokeError,
    },
    /// The routing agent invocation itself failed.
    #[error("routing agent failed: {source}")]
    RouterFailed {
        #[source]
        source: InvokeError,
    },
}

/// Why a routing payload could not be decoded.
///
/// Diagnostic only. Decode failure is fail-soft: the previous routing
/// target is kept and the step budget bounds the run.
#[derive(Debug, Error)]
pub enum RouteDecodeError {
    #[error("reply carries no function call")]
    MissingFunctionCall,
    #[error("unexpected function '{name}'")]
    WrongFunction { name: String },
    #[error("arguments are not valid JSON with a 'next' key: {message}")]
    BadArguments { message: String },
}
