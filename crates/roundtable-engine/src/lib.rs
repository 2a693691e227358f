//! roundtable-engine — supervisor-directed multi-agent turn-taking.
//!
//! A scenario run is a strictly sequential conversation between named role
//! agents, coordinated by a routing supervisor: the supervisor picks who
//! speaks, the chosen worker speaks and hands control straight back, and
//! the loop ends when the supervisor signals the terminal sentinel or the
//! supervisor-invocation budget runs out.
//!
//! This crate owns the state machine, the routing contract, and the budget
//! safeguard. The LLM calls behind agents arrive through the narrow
//! [`AgentInvoker`] and [`RouteInvoker`] seams; concrete implementations
//! live in companion crates.

pub mod config;
pub mod driver;
pub mod errors;
pub mod graph;
pub mod nodes;
pub mod state;
pub mod traits;

// config
pub use config::{Role, ScenarioConfig, SupervisorPrompts};

// driver
pub use driver::{run_scenario, DEFAULT_RECURSION_LIMIT};

// errors
pub use errors::{ConfigError, EngineError, GraphBuildError, InvokeError, RouteDecodeError};

// graph
pub use graph::{GraphRun, RunOutcome, StepOutput, TeamGraph, TeamGraphBuilder};

// nodes
pub use nodes::{SupervisorNode, WorkerNode};

// state
pub use state::{Destination, ScratchpadEntry, SharedState, FINISH, ROUTE_FN, SUPERVISOR};

// traits
pub use traits::{
    AgentContext, AgentInvoker, AgentReply, FunctionCallPayload, RouteInvoker, RouteReply,
};
