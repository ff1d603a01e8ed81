// Dispatch configuration loaded from LAMBDAFAI_* environment variables

use crate::error::ConfigError;
use std::collections::HashMap;

pub const ENV_PREFIX: &str = "LAMBDAFAI";

const DEFAULT_ENVIRONMENT: &str = "dev";
const DEFAULT_PRODUCTION_ENVIRONMENTS: [&str; 2] = ["prod", "production"];

/// Settings that shape dispatch but not routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Environment for events that carry none (no function alias).
    pub default_environment: String,
    /// Environment tags treated as production, compared case-insensitively.
    pub production_environments: Vec<String>,
    /// Log every dispatch at debug level.
    pub log_requests: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_environment: DEFAULT_ENVIRONMENT.to_string(),
            production_environments: DEFAULT_PRODUCTION_ENVIRONMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_requests: true,
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_environment(mut self, environment: impl Into<String>) -> Self {
        self.default_environment = environment.into();
        self
    }

    pub fn production_environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.production_environments = environments.into_iter().map(Into::into).collect();
        self
    }

    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// True if `environment` is production-tagged.
    pub fn is_production(&self, environment: &str) -> bool {
        self.production_environments
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(environment))
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a `.env`-style file, then the process environment.
    pub fn from_env_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a map of variables, e.g. in tests.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Load using `lookup` to resolve fully prefixed variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}_{}", ENV_PREFIX, name));
        let mut config = Self::default();

        if let Some(environment) = var("ENVIRONMENT") {
            let environment = environment.trim();
            if environment.is_empty() {
                return Err(invalid("ENVIRONMENT", environment, "must not be empty"));
            }
            config.default_environment = environment.to_string();
        }

        if let Some(tags) = var("PRODUCTION_ENVIRONMENTS") {
            config.production_environments = tags
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(flag) = var("LOG_REQUESTS") {
            config.log_requests = parse_bool(&flag)
                .ok_or_else(|| invalid("LOG_REQUESTS", &flag, "expected a boolean"))?;
        }

        Ok(config)
    }
}

fn invalid(name: &str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: format!("{}_{}", ENV_PREFIX, name),
        value: value.to_string(),
        reason,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
