//! Supervisor node: routing decisions.
//!
//! The supervisor wraps the routing agent. Each turn it reads the shared
//! conversation, asks the agent who acts next, and writes the decision into
//! state. The decision arrives as a function-call payload named
//! [`ROUTE_FN`] whose JSON arguments carry a `next` key.

use std::sync::Arc;

use serde::Deserialize;

use crate::errors::{EngineError, RouteDecodeError};
use crate::state::{Destination, SharedState, ROUTE_FN, SUPERVISOR};
use crate::traits::{AgentContext, RouteInvoker, RouteReply};

#[derive(Debug, Deserialize)]
struct RouteArgs {
    next: String,
}

/// Wraps the routing agent behind the `supervisor` node id.
pub struct SupervisorNode {
    router: Arc<dyn RouteInvoker>,
}

impl SupervisorNode {
    pub fn new(router: Arc<dyn RouteInvoker>) -> Self {
        Self { router }
    }

    /// Run one routing turn.
    ///
    /// Round accounting: a round is one decision plus the worker turn it
    /// triggers, so the counter advances when the supervisor reconvenes
    /// after a worker has acted. The seeded banner and the first
    /// contribution share round 1.
    ///
    /// A decodable decision sets `next` and appends an audit record. An
    /// undecodable payload keeps the previous `next`: the run repeats the
    /// stale target until the step budget fires. That keeps a flaky router
    /// from killing the run at the cost of masking its errors, so the
    /// failure is counted in `undecided_routes` and logged.
    pub async fn execute(&self, state: &mut SharedState) -> Result<(), EngineError> {
        if state
            .latest_scratchpad()
            .is_some_and(|entry| entry.agent != SUPERVISOR)
        {
            state.step += 1;
        }

        tracing::info!(step = state.step, "supervisor turn");
        let context = AgentContext::snapshot(state);
        let reply = self
            .router
            .invoke(&context)
            .await
            .map_err(|source| EngineError::RouterFailed { source })?;

        match decode_route(&reply) {
            Ok(target) => {
                tracing::info!(step = state.step, %target, "supervisor selected next actor");
                state.record(SUPERVISOR, format!("Supervisor selected {target}"));
                state.next = target;
            }
            Err(reason) => {
                state.undecided_routes += 1;
                tracing::warn!(
                    step = state.step,
                    undecided = state.undecided_routes,
                    %reason,
                    "routing decision not decodable; keeping previous target"
                );
            }
        }
        Ok(())
    }
}

/// Extract a routing target from the reply's function-call payload.
///
/// The target is deliberately not checked against the worker registry here;
/// that happens when the graph engine follows the edge.
fn decode_route(reply: &RouteReply) -> Result<Destination, RouteDecodeError> {
    let call = reply
        .function_call
        .as_ref()
        .ok_or(RouteDecodeError::MissingFunctionCall)?;
    if call.name != ROUTE_FN {
        return Err(RouteDecodeError::WrongFunction {
            name: call.name.clone(),
        });
    }
    let args: RouteArgs =
        serde_json::from_str(&call.arguments).map_err(|e| RouteDecodeError::BadArguments {
            message: e.to_string(),
        })?;
    Ok(Destination::from_route_value(&args.next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InvokeError;
    use crate::traits::FunctionCallPayload;
    use async_trait::async_trait;

    struct FixedRouter {
        reply: RouteReply,
    }

    #[async_trait]
    impl RouteInvoker for FixedRouter {
        async fn invoke(&self, _context: &AgentContext) -> Result<RouteReply, InvokeError> {
            Ok(self.reply.clone())
        }
    }

    struct FailingRouter;

    #[async_trait]
    impl RouteInvoker for FailingRouter {
        async fn invoke(&self, _context: &AgentContext) -> Result<RouteReply, InvokeError> {
            Err(InvokeError::Request {
                message: "timeout".into(),
            })
        }
    }

    fn route_reply(target: &str) -> RouteReply {
        RouteReply {
            function_call: Some(FunctionCallPayload {
                name: ROUTE_FN.into(),
                arguments: format!(r#"{{"next": "{target}"}}"#),
            }),
        }
    }

    fn node_with(reply: RouteReply) -> SupervisorNode {
        SupervisorNode::new(Arc::new(FixedRouter { reply }))
    }

    #[tokio::test]
    async fn selects_worker_and_records_decision() {
        let node = node_with(route_reply("Scout"));
        let mut state = SharedState::seeded("banner");

        node.execute(&mut state).await.unwrap();

        assert_eq!(state.next, Destination::Agent("Scout".into()));
        assert_eq!(state.step, 1);
        let entry = state.latest_scratchpad().unwrap();
        assert_eq!(entry.agent, "supervisor");
        assert_eq!(entry.output, "Supervisor selected Scout");
        assert_eq!(entry.step, 1);
    }

    #[tokio::test]
    async fn advances_round_after_worker_turn() {
        let node = node_with(route_reply("FINISH"));
        let mut state = SharedState::seeded("banner");
        state.record("Scout", "done searching");

        node.execute(&mut state).await.unwrap();

        assert_eq!(state.step, 2);
        assert_eq!(state.next, Destination::Finish);
        assert_eq!(state.latest_scratchpad().unwrap().step, 2);
    }

    #[tokio::test]
    async fn no_round_advance_on_first_turn() {
        let node = node_with(route_reply("Scout"));
        let mut state = SharedState::seeded("banner");

        node.execute(&mut state).await.unwrap();
        assert_eq!(state.step, 1);
    }

    #[tokio::test]
    async fn missing_function_call_is_fail_soft() {
        let node = node_with(RouteReply::default());
        let mut state = SharedState::seeded("banner");
        state.next = Destination::Agent("Scout".into());

        node.execute(&mut state).await.unwrap();

        assert_eq!(state.next, Destination::Agent("Scout".into()));
        assert_eq!(state.step, 1);
        assert_eq!(state.undecided_routes, 1);
        assert!(state.scratchpad.is_empty());
    }

    #[tokio::test]
    async fn wrong_function_name_is_fail_soft() {
        let node = node_with(RouteReply {
            function_call: Some(FunctionCallPayload {
                name: "summarize".into(),
                arguments: r#"{"next": "Scout"}"#.into(),
            }),
        });
        let mut state = SharedState::seeded("banner");

        node.execute(&mut state).await.unwrap();

        assert_eq!(state.next, Destination::Supervisor);
        assert_eq!(state.undecided_routes, 1);
    }

    #[tokio::test]
    async fn malformed_arguments_are_fail_soft() {
        for arguments in [r#"{"nxt": "Scout"}"#, "{not json", ""] {
            let node = node_with(RouteReply {
                function_call: Some(FunctionCallPayload {
                    name: ROUTE_FN.into(),
                    arguments: arguments.into(),
                }),
            });
            let mut state = SharedState::seeded("banner");

            node.execute(&mut state).await.unwrap();

            assert_eq!(state.next, Destination::Supervisor, "for {arguments:?}");
            assert_eq!(state.undecided_routes, 1, "for {arguments:?}");
        }
    }

    #[tokio::test]
    async fn router_failure_propagates() {
        let node = SupervisorNode::new(Arc::new(FailingRouter));
        let mut state = SharedState::seeded("banner");

        let err = node.execute(&mut state).await.unwrap_err();
        assert!(matches!(err, EngineError::RouterFailed { .. }));
    }

    #[test]
    fn decode_does_not_validate_against_registry() {
        let decoded = decode_route(&route_reply("NoSuchAgent")).unwrap();
        assert_eq!(decoded, Destination::Agent("NoSuchAgent".into()));
    }
}
