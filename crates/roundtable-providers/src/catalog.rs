//! Known model table: which companies and models the app offers by default.

use serde::{Deserialize, Serialize};

/// Defaults for one known chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub company: String,
    pub model: String,
    pub temperature: f32,
}

/// Lookup table of known models, keyed by company and model name.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    entries: Vec<ModelSpec>,
}

impl ModelCatalog {
    /// The built-in table: OpenAI and Ollama defaults.
    pub fn builtin() -> Self {
        let entry = |company: &str, model: &str| ModelSpec {
            company: company.into(),
            model: model.into(),
            temperature: 0.3,
        };
        Self {
            entries: vec![
                entry("openai", "gpt-4o-mini"),
                entry("openai", "gpt-4o"),
                entry("ollama", "llama3.1:8b"),
                entry("ollama", "llama3.1:70b"),
            ],
        }
    }

    pub fn add(&mut self, spec: ModelSpec) {
        self.entries.push(spec);
    }

    pub fn get(&self, company: &str, model: &str) -> Option<&ModelSpec> {
        self.entries
            .iter()
            .find(|spec| spec.company == company && spec.model == model)
    }

    /// Distinct companies, in table order.
    pub fn companies(&self) -> Vec<&str> {
        let mut companies: Vec<&str> = Vec::new();
        for spec in &self.entries {
            if !companies.contains(&spec.company.as_str()) {
                companies.push(&spec.company);
            }
        }
        companies
    }

    /// Models offered by one company, in table order.
    pub fn models_for(&self, company: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|spec| spec.company == company)
            .map(|spec| spec.model.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_both_companies() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.companies(), vec!["openai", "ollama"]);
        assert_eq!(
            catalog.models_for("ollama"),
            vec!["llama3.1:8b", "llama3.1:70b"]
        );
    }

    #[test]
    fn lookup_and_default_temperature() {
        let catalog = ModelCatalog::builtin();
        let spec = catalog.get("openai", "gpt-4o-mini").unwrap();
        assert!((spec.temperature - 0.3).abs() < f32::EPSILON);
        assert!(catalog.get("openai", "gpt-3").is_none());
    }

    #[test]
    fn add_extends_the_table() {
        let mut catalog = ModelCatalog::builtin();
        catalog.add(ModelSpec {
            company: "local".into(),
            model: "tiny".into(),
            temperature: 0.7,
        });
        assert!(catalog.get("local", "tiny").is_some());
        assert!(catalog.companies().contains(&"local"));
    }
}
