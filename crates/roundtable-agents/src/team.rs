//! Wire a scenario config into a runnable team graph.

use std::sync::Arc;

use thiserror::Error;

use roundtable_engine::{
    AgentInvoker, ConfigError, GraphBuildError, RouteInvoker, ScenarioConfig, TeamGraph,
};
use roundtable_providers::ChatProvider;

use crate::role::RoleAgent;
use crate::router::RoutingAgent;

/// Errors from turning a config into a graph.
#[derive(Debug, Error)]
pub enum TeamBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Graph(#[from] GraphBuildError),
}

/// Build the graph for a scenario config: one role agent per member plus
/// the routing agent, all speaking through `provider` with `model`.
///
/// The config is re-validated first, so member and role names are known to
/// line up before any agent is constructed.
pub fn build_team(
    provider: Arc<dyn ChatProvider>,
    model: &str,
    config: &ScenarioConfig,
) -> Result<TeamGraph, TeamBuildError> {
    config.validate()?;

    let router = RoutingAgent::new(
        Arc::clone(&provider),
        model,
        config.supervisor_prompts.clone(),
        &config.members,
    );

    let mut builder = TeamGraph::builder(Arc::new(router) as Arc<dyn RouteInvoker>);
    for member in &config.members {
        let role = config.role(member).ok_or_else(|| {
            TeamBuildError::Config(ConfigError::Invalid {
                issues: vec![format!("member '{member}' has no matching role")],
            })
        })?;
        let agent = RoleAgent::new(Arc::clone(&provider), model, role.clone());
        builder = builder.agent(member.clone(), Arc::new(agent) as Arc<dyn AgentInvoker>);
    }

    let graph = builder.build()?;
    tracing::info!(members = config.members.len(), "team graph assembled");
    Ok(graph)
}
