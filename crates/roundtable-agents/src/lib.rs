//! roundtable-agents — the LLM-backed personas behind the engine's seams.
//!
//! [`RoleAgent`] plays one configured role per worker node; [`RoutingAgent`]
//! makes the supervisor's decisions through an enum-constrained function
//! schema; [`build_team`] wires a validated scenario config into a runnable
//! graph; the generator module produces scenario configs from source text.

pub mod generator;
pub mod role;
pub mod router;
pub mod team;

pub use generator::{generate_scenario_config, strip_code_fences, GeneratorError};
pub use role::RoleAgent;
pub use router::RoutingAgent;
pub use team::{build_team, TeamBuildError};

use roundtable_engine::InvokeError;
use roundtable_providers::ProviderError;

/// Map a provider failure onto the engine's invocation error.
pub(crate) fn invoke_error(err: ProviderError) -> InvokeError {
    match err {
        ProviderError::InvalidResponse(message) => InvokeError::Response { message },
        other => InvokeError::Request {
            message: other.to_string(),
        },
    }
}
