use crate::error::ConfigError;
use crate::extract::DEFAULT_MAX_DEPTH;
use crate::ops::{builtin_overrides, ParamRule};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const MAX_DEPTH_ENV: &str = "ALPHA_FIELDS_MAX_DEPTH";
pub const DEFAULT_PLATFORM_ADDR: &str = "https://platform.worldquantbrain.com";

/// Session settings, usually read from a TOML file:
///
/// ```toml
/// max_depth = 50
/// platform_addr = "https://platform.worldquantbrain.com"
///
/// [overrides.vec_choose]
/// positions = [0, 1]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub max_depth: usize,
    pub platform_addr: String,
    pub overrides: BTreeMap<String, OverrideRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideRule {
    pub positions: Vec<usize>,
    #[serde(default = "default_ignore_named")]
    pub ignore_named: bool,
}

fn default_ignore_named() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            platform_addr: DEFAULT_PLATFORM_ADDR.to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Applies `ALPHA_FIELDS_MAX_DEPTH` when it is set to a positive integer.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(depth) = std::env::var(MAX_DEPTH_ENV)
            .ok()
            .and_then(|raw| parse_max_depth(&raw))
        {
            self.max_depth = depth;
        }
        self
    }

    /// Built-in override rules with the configured ones layered on top.
    pub fn override_rules(&self) -> BTreeMap<String, ParamRule> {
        let mut rules = builtin_overrides();
        for (name, rule) in &self.overrides {
            rules.insert(
                name.clone(),
                ParamRule {
                    field_positions: rule.positions.clone(),
                    ignore_named: rule.ignore_named,
                },
            );
        }
        rules
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        if let Some((name, _)) = self
            .overrides
            .iter()
            .find(|(_, rule)| rule.positions.is_empty())
        {
            return Err(ConfigError::EmptyOverride { name: name.clone() });
        }
        Ok(())
    }
}

fn parse_max_depth(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|depth| *depth > 0)
}
