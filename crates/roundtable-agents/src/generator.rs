//! Scenario-config generation from source material.
//!
//! Callers load the source text however they like; this module only owns
//! the LLM round trip: prompt for a config-shaped JSON document, strip any
//! markdown fences from the reply, then parse and validate it.

use thiserror::Error;

use roundtable_engine::{ConfigError, ScenarioConfig};
use roundtable_providers::{ChatMessage, ChatProvider, ChatRequest, ProviderError};

const GENERATOR_SYSTEM_PROMPT: &str = "You are tasked with generating a JSON configuration for \
    a multi-agent scenario. The configuration should define the roles, prompts, and scenario \
    details for the agents involved. Use the example below as a template for structure only. \
    Do not copy any of the values, only use the structure:";

const GENERATOR_TEMPLATE: &str = r#"Example Configuration Structure:
{
    "supervisor_prompts": {
        "initial": "This is where the prompt for the initial instruction goes.",
        "decision": "This is where the prompt for decision making goes."
    },
    "members": [
        "Role 1",
        "Role 2",
        "Role 3"
    ],
    "roles": [
        {
            "name": "Role 1",
            "prompt": "This is the specific prompt for Role 1."
        },
        {
            "name": "Role 2",
            "prompt": "This is the specific prompt for Role 2."
        },
        {
            "name": "Role 3",
            "prompt": "This is the specific prompt for Role 3."
        }
    ],
    "scenario": "This is where the scenario description goes."
}
"#;

/// Errors from generating a scenario config.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("generated config rejected: {0}")]
    Config(#[from] ConfigError),
}

/// Strip a markdown code fence from a model reply, keeping its body.
/// Replies without fences pass through trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + "```json".len()..];
        let end = rest.find("```").unwrap_or(rest.len());
        rest[..end].trim()
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        let end = rest.find("```").unwrap_or(rest.len());
        rest[..end].trim()
    } else {
        trimmed
    }
}

/// Ask the model for a scenario config shaped like the template, based on
/// already-loaded source text. Returns the validated config together with
/// its pretty-printed JSON.
pub async fn generate_scenario_config(
    provider: &dyn ChatProvider,
    model: &str,
    sources: &[String],
) -> Result<(ScenarioConfig, String), GeneratorError> {
    let combined = sources.join("\n\n");
    tracing::info!(sources = sources.len(), "generating scenario config");

    let request = ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(GENERATOR_SYSTEM_PROMPT),
            ChatMessage::system(GENERATOR_TEMPLATE),
            ChatMessage::user(format!(
                "Based on the following content, generate a similar JSON configuration:\n{combined}"
            )),
        ],
        temperature: Some(0.3),
        max_tokens: None,
        functions: None,
        function_call: None,
    };

    let response = provider.complete(request).await?;
    let cleaned = strip_code_fences(&response.content);
    let config = ScenarioConfig::from_json(cleaned)?;
    let pretty = serde_json::to_string_pretty(&config).map_err(ConfigError::Json)?;
    Ok((config, pretty))
}
