//! Scenario configuration: the externally supplied description of a team.
//!
//! The config is trusted to match the worker identifiers registered in the
//! graph, so [`ScenarioConfig::validate`] checks exactly that kind of
//! internal consistency before anything is built from it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::state::{FINISH, SUPERVISOR};

/// A named role and the system prompt that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub prompt: String,
}

/// The two prompts framing every routing decision: `initial` opens the
/// conversation for the routing agent, `decision` closes it and may carry
/// an `{options}` placeholder for the legal targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorPrompts {
    pub initial: String,
    pub decision: String,
}

/// Complete description of a scenario: who plays, how the supervisor
/// decides, and the situation the team is dropped into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub supervisor_prompts: SupervisorPrompts,
    pub members: Vec<String>,
    pub roles: Vec<Role>,
    pub scenario: String,
}

impl ScenarioConfig {
    /// Decode and validate a config from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Decode and validate a config from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Check internal consistency. All problems are collected and reported
    /// together rather than failing on the first one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        if self.scenario.trim().is_empty() {
            issues.push("scenario must not be empty".to_string());
        }
        if self.members.is_empty() {
            issues.push("members must contain at least one name".to_string());
        }

        let mut seen = HashSet::new();
        for role in &self.roles {
            if role.name.trim().is_empty() {
                issues.push("role name must not be empty".to_string());
                continue;
            }
            if !seen.insert(role.name.as_str()) {
                issues.push(format!("duplicate role name: {}", role.name));
            }
            if role.name == SUPERVISOR || role.name == FINISH {
                issues.push(format!("role name '{}' is reserved", role.name));
            }
        }

        for member in &self.members {
            if !self.roles.iter().any(|role| &role.name == member) {
                issues.push(format!("member '{member}' has no matching role"));
            }
        }
        for role in &self.roles {
            if !role.name.trim().is_empty() && !self.members.contains(&role.name) {
                issues.push(format!("role '{}' is not listed in members", role.name));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { issues })
        }
    }

    /// Look up a member's role.
    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> ScenarioConfig {
        ScenarioConfig {
            supervisor_prompts: SupervisorPrompts {
                initial: "You direct a rescue team.".into(),
                decision: "Pick the next role from: {options}.".into(),
            },
            members: vec!["Scout".into(), "Medic".into()],
            roles: vec![
                Role {
                    name: "Scout".into(),
                    prompt: "You scout terrain.".into(),
                },
                Role {
                    name: "Medic".into(),
                    prompt: "You treat injuries.".into(),
                },
            ],
            scenario: "A hiker is missing in the valley.".into(),
        }
    }

    fn issues_of(config: &ScenarioConfig) -> Vec<String> {
        match config.validate() {
            Err(ConfigError::Invalid { issues }) => issues,
            other => panic!("expected Invalid, got: {other:?}"),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let config = sample();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back = ScenarioConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn rejects_empty_scenario() {
        let mut config = sample();
        config.scenario = "   ".into();
        assert!(issues_of(&config).iter().any(|i| i.contains("scenario")));
    }

    #[test]
    fn rejects_member_without_role() {
        let mut config = sample();
        config.members.push("Pilot".into());
        assert!(issues_of(&config)
            .iter()
            .any(|i| i.contains("'Pilot' has no matching role")));
    }

    #[test]
    fn rejects_role_without_member() {
        let mut config = sample();
        config.roles.push(Role {
            name: "Pilot".into(),
            prompt: "You fly.".into(),
        });
        assert!(issues_of(&config)
            .iter()
            .any(|i| i.contains("'Pilot' is not listed in members")));
    }

    #[test]
    fn rejects_duplicate_and_reserved_names() {
        let mut config = sample();
        config.roles.push(Role {
            name: "Scout".into(),
            prompt: "again".into(),
        });
        config.members.push("supervisor".into());
        config.roles.push(Role {
            name: "supervisor".into(),
            prompt: "nope".into(),
        });
        let issues = issues_of(&config);
        assert!(issues.iter().any(|i| i.contains("duplicate role name")));
        assert!(issues.iter().any(|i| i.contains("reserved")));
    }

    #[test]
    fn rejects_empty_members() {
        let mut config = sample();
        config.members.clear();
        config.roles.clear();
        assert!(issues_of(&config).iter().any(|i| i.contains("members")));
    }

    #[test]
    fn rejects_bad_json() {
        let err = ScenarioConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&sample()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = ScenarioConfig::from_path(file.path()).unwrap();
        assert_eq!(config.members.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ScenarioConfig::from_path("/nonexistent/scenario.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
