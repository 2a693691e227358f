//! The team graph: fixed topology, dynamic supervisor routing.
//!
//! Nodes are the supervisor plus one worker per registered agent. Every
//! worker has a single unconditional edge back to the supervisor; the
//! supervisor's outgoing edge is chosen at each step by reading
//! `state.next`, with the terminal sentinel mapping to completion.
//!
//! Execution is strictly sequential and pull-driven: exactly one node runs
//! at a time, each awaited to completion, and the run only advances while
//! the caller keeps asking for steps.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::Stream;

use crate::errors::{EngineError, GraphBuildError};
use crate::nodes::{SupervisorNode, WorkerNode};
use crate::state::{Destination, SharedState, FINISH, SUPERVISOR};
use crate::traits::{AgentInvoker, RouteInvoker};

/// Builder for [`TeamGraph`]. Register agents, then [`build`](Self::build).
pub struct TeamGraphBuilder {
    router: Arc<dyn RouteInvoker>,
    agents: Vec<(String, Arc<dyn AgentInvoker>)>,
}

impl TeamGraphBuilder {
    /// Register a worker agent under its role name.
    pub fn agent(mut self, name: impl Into<String>, invoker: Arc<dyn AgentInvoker>) -> Self {
        self.agents.push((name.into(), invoker));
        self
    }

    /// Validate names and assemble the immutable graph.
    pub fn build(self) -> Result<TeamGraph, GraphBuildError> {
        if self.agents.is_empty() {
            return Err(GraphBuildError::NoAgents);
        }
        let mut workers = BTreeMap::new();
        for (name, invoker) in self.agents {
            if name.trim().is_empty() {
                return Err(GraphBuildError::EmptyAgentName);
            }
            if name == SUPERVISOR || name == FINISH {
                return Err(GraphBuildError::ReservedName { name });
            }
            if workers.contains_key(&name) {
                return Err(GraphBuildError::DuplicateAgent { name });
            }
            workers.insert(name.clone(), WorkerNode::new(name, invoker));
        }
        Ok(TeamGraph {
            inner: Arc::new(GraphInner {
                supervisor: SupervisorNode::new(self.router),
                workers,
            }),
        })
    }
}

struct GraphInner {
    supervisor: SupervisorNode,
    workers: BTreeMap<String, WorkerNode>,
}

/// Immutable, cheaply clonable graph of one supervisor plus its workers.
#[derive(Clone)]
pub struct TeamGraph {
    inner: Arc<GraphInner>,
}

impl std::fmt::Debug for TeamGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamGraph")
            .field("workers", &self.inner.workers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TeamGraph {
    /// Start building a graph around the given routing agent.
    pub fn builder(router: Arc<dyn RouteInvoker>) -> TeamGraphBuilder {
        TeamGraphBuilder {
            router,
            agents: Vec::new(),
        }
    }

    /// Names of all registered workers, sorted.
    pub fn agent_names(&self) -> Vec<String> {
        self.inner.workers.keys().cloned().collect()
    }

    /// Begin a run over `state` with a supervisor-invocation budget.
    /// Every run enters at the supervisor.
    pub fn run(&self, state: SharedState, recursion_limit: u32) -> GraphRun {
        GraphRun {
            graph: self.clone(),
            state,
            pending: None,
            supervisor_calls: 0,
            recursion_limit,
            outcome: None,
            poisoned: false,
        }
    }
}

/// How a run ended, when it ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The supervisor routed to the terminal sentinel.
    Finished,
    /// The supervisor-invocation budget ran out first.
    BudgetExhausted,
}

/// Output of one engine step: the node that ran and the message list as it
/// stood afterwards.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub node: String,
    pub messages: Vec<String>,
}

enum NextNode {
    Supervisor,
    Worker(String),
}

/// A single-pass, pull-driven run. Not restartable: once the step sequence
/// ends (terminal sentinel, exhausted budget, or error) it stays ended.
pub struct GraphRun {
    graph: TeamGraph,
    state: SharedState,
    /// Node to execute next; `None` means the pending edge has not been
    /// resolved yet and `state.next` is read on the next pull.
    pending: Option<NextNode>,
    supervisor_calls: u32,
    recursion_limit: u32,
    outcome: Option<RunOutcome>,
    poisoned: bool,
}

impl GraphRun {
    /// Advance by exactly one node. Returns `Ok(None)` once the run is
    /// over; the first error ends the run permanently.
    pub async fn next_step(&mut self) -> Result<Option<StepOutput>, EngineError> {
        if self.outcome.is_some() || self.poisoned {
            return Ok(None);
        }

        // Edges are resolved lazily, so a bad routing target surfaces on
        // the pull after the deciding node's output was already emitted.
        let node = match self.pending.take() {
            Some(node) => node,
            None => match self.resolve_edge()? {
                Some(node) => node,
                None => {
                    tracing::info!(rounds = self.state.step, "run reached terminal target");
                    self.outcome = Some(RunOutcome::Finished);
                    return Ok(None);
                }
            },
        };

        match node {
            NextNode::Supervisor => {
                if self.supervisor_calls >= self.recursion_limit {
                    tracing::warn!(
                        limit = self.recursion_limit,
                        "supervisor budget exhausted, stopping run"
                    );
                    self.outcome = Some(RunOutcome::BudgetExhausted);
                    return Ok(None);
                }
                self.supervisor_calls += 1;
                let graph = self.graph.clone();
                if let Err(err) = graph.inner.supervisor.execute(&mut self.state).await {
                    self.poisoned = true;
                    return Err(err);
                }
                Ok(Some(self.emit(SUPERVISOR)))
            }
            NextNode::Worker(name) => {
                let graph = self.graph.clone();
                let Some(worker) = graph.inner.workers.get(&name) else {
                    self.poisoned = true;
                    return Err(EngineError::UnknownRoute {
                        target: name,
                        registered: self.graph.agent_names(),
                    });
                };
                if let Err(err) = worker.execute(&mut self.state).await {
                    self.poisoned = true;
                    return Err(err);
                }
                // Worker edges are unconditional.
                self.pending = Some(NextNode::Supervisor);
                Ok(Some(self.emit(&name)))
            }
        }
    }

    fn resolve_edge(&mut self) -> Result<Option<NextNode>, EngineError> {
        match &self.state.next {
            Destination::Supervisor => Ok(Some(NextNode::Supervisor)),
            Destination::Finish => Ok(None),
            Destination::Agent(name) => {
                if self.graph.inner.workers.contains_key(name) {
                    Ok(Some(NextNode::Worker(name.clone())))
                } else {
                    self.poisoned = true;
                    Err(EngineError::UnknownRoute {
                        target: name.clone(),
                        registered: self.graph.agent_names(),
                    })
                }
            }
        }
    }

    fn emit(&self, node: &str) -> StepOutput {
        StepOutput {
            node: node.to_string(),
            messages: self.state.messages.clone(),
        }
    }

    /// How the run ended, once the step sequence is over.
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Supervisor invocations so far.
    pub fn supervisor_calls(&self) -> u32 {
        self.supervisor_calls
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn into_state(self) -> SharedState {
        self.state
    }

    /// Adapt the run into a lazy stream of step outputs. Single-pass; the
    /// stream ends permanently after the terminal target, an exhausted
    /// budget, or the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<StepOutput, EngineError>> {
        futures::stream::unfold(self, |mut run| async move {
            match run.next_step().await {
                Ok(Some(step)) => Some((Ok(step), run)),
                Ok(None) => None,
                Err(err) => Some((Err(err), run)),
            }
        })
    }
}
