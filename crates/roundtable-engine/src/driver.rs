//! Execution driver: seeds state, owns the termination policy, and relays
//! each rendered message to the caller exactly once.
//!
//! The driver is the piece callers interact with. It turns a scenario text
//! plus a built [`TeamGraph`] into a lazy stream of message strings:
//! consumption happens in lock-step with graph execution, so a caller that
//! stops polling also stops driving the run forward.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use futures::Stream;
use uuid::Uuid;

use crate::errors::EngineError;
use crate::graph::{GraphRun, RunOutcome, TeamGraph};
use crate::state::SharedState;

/// Default supervisor-invocation budget. The configurable range callers
/// usually expose is 10 to 100.
pub const DEFAULT_RECURSION_LIMIT: u32 = 25;

/// Render the banner that seeds the conversation.
fn scenario_banner(scenario: &str) -> String {
    format!("# Step 1 - Scenario\n{scenario}")
}

/// Drive a full scenario run, yielding each rendered message exactly once.
///
/// Budget exhaustion ends the stream early with the messages produced so
/// far; it is logged, not surfaced as an error. Agent failures and unknown
/// routing targets end the stream with a terminal `Err` item.
pub fn run_scenario(
    graph: &TeamGraph,
    scenario: &str,
    recursion_limit: u32,
) -> impl Stream<Item = Result<String, EngineError>> {
    let run = graph.run(SharedState::seeded(scenario_banner(scenario)), recursion_limit);
    futures::stream::unfold(MessageRelay::new(run), |mut relay| async move {
        relay.next_message().await.map(|item| (item, relay))
    })
}

/// Pulls engine steps and forwards unseen messages one at a time.
struct MessageRelay {
    run: GraphRun,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    seen: HashSet<String>,
    ready: VecDeque<String>,
    done: bool,
}

impl MessageRelay {
    fn new(run: GraphRun) -> Self {
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, "scenario run starting");
        Self {
            run,
            run_id,
            started_at: Utc::now(),
            seen: HashSet::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }

    async fn next_message(&mut self) -> Option<Result<String, EngineError>> {
        loop {
            if let Some(message) = self.ready.pop_front() {
                return Some(Ok(message));
            }
            if self.done {
                return None;
            }
            match self.run.next_step().await {
                Ok(Some(step)) => {
                    tracing::debug!(run_id = %self.run_id, node = %step.node, "node step processed");
                    for message in step.messages {
                        if self.seen.insert(message.clone()) {
                            self.ready.push_back(message);
                        }
                    }
                }
                Ok(None) => {
                    self.done = true;
                    self.log_outcome();
                }
                Err(err) => {
                    self.done = true;
                    tracing::error!(run_id = %self.run_id, error = %err, "scenario run failed");
                    return Some(Err(err));
                }
            }
        }
    }

    fn log_outcome(&self) {
        let elapsed_ms = (Utc::now() - self.started_at).num_milliseconds();
        match self.run.outcome() {
            Some(RunOutcome::Finished) => {
                tracing::info!(
                    run_id = %self.run_id,
                    elapsed_ms,
                    relayed = self.seen.len(),
                    "scenario run finished"
                );
            }
            Some(RunOutcome::BudgetExhausted) => {
                tracing::error!(
                    run_id = %self.run_id,
                    elapsed_ms,
                    relayed = self.seen.len(),
                    "recursion limit reached before the supervisor signalled completion; \
                     consider raising the limit"
                );
            }
            None => {}
        }
    }
}
