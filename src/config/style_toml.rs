//! Parsing and validation for stylefix.toml configuration files

use crate::config::options::RuleConfig;
use crate::config::rule_set::RuleSet;
use crate::engine::convergence::DEFAULT_MAX_PASSES;
use crate::error::ConfigError;
use crate::rules::RuleRegistry;
use crate::types::{Dialect, RuleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Main configuration struct for stylefix.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Rule configuration, keyed by rule ID
    #[serde(default)]
    pub rules: BTreeMap<RuleId, RuleValue>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_passes == 0 {
            return Err(ConfigError::Validation(
                "engine.max_passes must be at least 1".to_string(),
            ));
        }

        for (rule_id, rule_value) in &self.rules {
            if let RuleValue::Options(value) = rule_value
                && !(value.is_string() || value.is_object() || value.is_array())
            {
                return Err(ConfigError::InvalidShape {
                    rule: rule_id.to_string(),
                    message: format!("expected a boolean, string, table or array, found {value}"),
                });
            }
        }

        Ok(())
    }

    /// Look up and normalize every enabled rule
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRule` for a rule the registry does not
    /// know, or the normalizer's error for malformed options.
    pub fn resolve(&self, registry: &RuleRegistry) -> Result<RuleSet, ConfigError> {
        let mut set = RuleSet::new();
        for (rule_id, rule_value) in &self.rules {
            let raw = match rule_value {
                RuleValue::Enabled(false) => continue,
                RuleValue::Enabled(true) => serde_json::Value::Null,
                RuleValue::Options(value) => value.clone(),
            };
            let rule = registry
                .get_rule(rule_id)
                .ok_or_else(|| ConfigError::UnknownRule(rule_id.to_string()))?;
            let config = RuleConfig::from_value(rule.name(), rule.schema(), &raw)?;
            set.insert(rule_id.clone(), config);
        }
        Ok(set)
    }
}

/// `[engine]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on fix rounds per unit
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,

    /// Parse as TypeScript
    #[serde(default)]
    pub typescript: bool,

    /// Accept JSX syntax
    #[serde(default = "default_jsx")]
    pub jsx: bool,
}

fn default_max_passes() -> usize {
    DEFAULT_MAX_PASSES
}

fn default_jsx() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            typescript: false,
            jsx: true,
        }
    }
}

impl EngineConfig {
    pub fn dialect(&self) -> Dialect {
        Dialect {
            typescript: self.typescript,
            jsx: self.jsx,
        }
    }
}

/// A rule is enabled with a boolean or configured with options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Simple boolean enable/disable
    Enabled(bool),
    /// Raw options in any shape the rule's schema accepts
    Options(serde_json::Value),
}
