//! Configuration management utilities
//!
//! [`Config`] is read once at startup from environment variables, after an
//! optional `.env` file has been loaded. Blank values count as unset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Result type alias for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The `.env` file could not be read
    #[error("Failed to load env file: {0}")]
    EnvFile(String),
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-field lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected pretty or json")),
        }
    }
}

/// Service configuration
#[derive(Clone)]
pub struct Config {
    /// OpenAI API key
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible API
    pub openai_api_base: String,
    /// Model identifier used by every agent
    pub model: String,
    /// HTTP timeout for one completion request, in seconds
    pub timeout_secs: u64,
    /// Sampling temperature; the provider default applies when unset
    pub temperature: Option<f32>,
    /// Completion token limit per request; the provider default applies when unset
    pub max_tokens: Option<usize>,
    /// Whether agents and crews log task progress
    pub verbose: bool,
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Name reported by the health endpoint
    pub service_name: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Default API base
    pub const DEFAULT_API_BASE: &'static str = "https://api.openai.com/v1";
    /// Default model
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
    /// Default service name
    pub const DEFAULT_SERVICE_NAME: &'static str = "CrewAI OpenAI Integration";

    /// Create a configuration with defaults for everything but the key
    pub fn new(openai_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            openai_api_base: Self::DEFAULT_API_BASE.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            timeout_secs: 120,
            temperature: None,
            max_tokens: None,
            verbose: true,
            host: "0.0.0.0".to_string(),
            port: 5000,
            service_name: Self::DEFAULT_SERVICE_NAME.to_string(),
            log_format: LogFormat::Pretty,
        }
    }

    /// Load an env file, then read the configuration from the environment
    ///
    /// With `None`, a `.env` in the working directory is loaded when present.
    /// An explicit path must exist. Variables already set in the process
    /// environment win over the file.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)
                    .map_err(|e| ConfigError::EnvFile(format!("{}: {e}", path.display())))?;
            }
            None => match dotenvy::dotenv() {
                Ok(_) => {}
                Err(e) if e.not_found() => {}
                Err(e) => return Err(ConfigError::EnvFile(e.to_string())),
            },
        }
        Self::from_env()
    }

    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key =
            var("OPENAI_API_KEY").ok_or_else(|| ConfigError::Missing("OPENAI_API_KEY".into()))?;
        let mut config = Self::new(api_key);

        if let Some(base) = var("OPENAI_API_BASE") {
            config.openai_api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(model) = var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(timeout) = var("OPENAI_TIMEOUT_SECS") {
            config.timeout_secs = parse("OPENAI_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(temperature) = var("LLM_TEMPERATURE") {
            config.temperature = Some(parse("LLM_TEMPERATURE", &temperature)?);
        }
        if let Some(max_tokens) = var("LLM_MAX_TOKENS") {
            config.max_tokens = Some(parse("LLM_MAX_TOKENS", &max_tokens)?);
        }
        if let Some(verbose) = var("CREW_VERBOSE") {
            config.verbose = parse_bool("CREW_VERBOSE", &verbose)?;
        }
        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(port) = var("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(name) = var("SERVICE_NAME") {
            config.service_name = name;
        }
        if let Some(format) = var("LOG_FORMAT") {
            config.log_format = format.parse().map_err(|reason| ConfigError::Invalid {
                var: "LOG_FORMAT".to_string(),
                value: format.clone(),
                reason,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(ConfigError::Missing("OPENAI_API_KEY".to_string()));
        }
        if let Some(temperature) = self.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            return Err(ConfigError::Invalid {
                var: "LLM_TEMPERATURE".to_string(),
                value: temperature.to_string(),
                reason: "must be between 0 and 2".to_string(),
            });
        }
        if self.max_tokens == Some(0) {
            return Err(ConfigError::Invalid {
                var: "LLM_MAX_TOKENS".to_string(),
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "OPENAI_TIMEOUT_SECS".to_string(),
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("openai_api_base", &self.openai_api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("verbose", &self.verbose)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("service_name", &self.service_name)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse<T>(var: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: var.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: var.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_api_base, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.temperature, None);
        assert_eq!(config.max_tokens, None);
        assert!(config.verbose);
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.service_name, "CrewAI OpenAI Integration");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://localhost:1234/v1/"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_TIMEOUT_SECS", "30"),
            ("LLM_TEMPERATURE", "0.2"),
            ("LLM_MAX_TOKENS", "512"),
            ("CREW_VERBOSE", "off"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SERVICE_NAME", "Crew"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.openai_api_base, "http://localhost:1234/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.max_tokens, Some(512));
        assert!(!config.verbose);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.service_name, "Crew");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_or_blank_key() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref var) if var == "OPENAI_API_KEY"));

        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config =
            Config::from_lookup(lookup(&[("OPENAI_API_KEY", "k"), ("OPENAI_MODEL", "")])).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for PORT: 'http'"));

        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "k"), ("CREW_VERBOSE", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "CREW_VERBOSE"));

        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "k"), ("LLM_TEMPERATURE", "3.5")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "LLM_TEMPERATURE"));

        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "k"), ("LOG_FORMAT", "xml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "LOG_FORMAT"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::new("sk-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_log_format_serde() {
        assert_eq!(serde_json::to_string(&LogFormat::Json).unwrap(), "\"json\"");
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/agent-crew.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile(_)));
    }
}
