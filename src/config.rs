//! Configuration management for Palingua
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Secrets are never stored in the file itself: the `[credentials]` section
//! only names environment variables, and the values are read at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    pub models: ModelsConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// Credential pool configuration
///
/// `env` lists environment variable NAMES; the secret values are read once at
/// startup via [`crate::resolver::Credential::pool_from_env`]. An empty or
/// entirely-unset pool is allowed here: it becomes a per-request
/// configuration error, not a startup crash, so the operator can fix the
/// environment and retry without restarting a supervisor loop.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_credential_env")]
    pub env: Vec<String>,
    #[serde(default)]
    pub strategy: SelectionStrategy,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env: default_credential_env(),
            strategy: SelectionStrategy::default(),
        }
    }
}

fn default_credential_env() -> Vec<String> {
    vec!["GEMINI_API_KEY".to_string()]
}

/// How a credential is picked from the pool on each request
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Always the first configured credential (deterministic, used in tests)
    #[default]
    First,
    /// Uniformly at random from the pool
    Random,
    /// Cycle through the pool across requests
    RoundRobin,
}

/// Remote model configuration
///
/// `preference` is an ordered list of model identifiers, most-preferred
/// first. Entries are validated for non-blankness here; full identifier
/// parsing happens per-candidate during resolution so one malformed entry
/// only costs its own slot in the walk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    preference: Vec<String>,
    /// When true, a 404-classified generation failure triggers exactly one
    /// re-resolution with the failed model excluded. Off by default.
    #[serde(default)]
    retry_on_unavailable: bool,
}

impl ModelsConfig {
    /// Base URL of the remote generation API (no trailing slash)
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Ordered model preference list, most-preferred first
    pub fn preference(&self) -> &[String] {
        &self.preference
    }

    /// Whether a model-unavailable failure gets one bounded fallback retry
    pub fn retry_on_unavailable(&self) -> bool {
        self.retry_on_unavailable
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Prompt template configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptConfig {
    #[serde(default = "default_template")]
    pub template: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
        }
    }
}

fn default_template() -> String {
    "You are a Pali scholar. Translate the following passage into English, \
     then provide a short commentary and a word-by-word gloss.\n\n\
     Passage: {passage}"
        .to_string()
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 3: Validate parsed config (provides contextual reason)
        config
            .validate()
            .map_err(|e| crate::error::AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()`, but can also be called
    /// explicitly when constructing Config via other means (e.g., in tests).
    pub fn validate(&self) -> crate::error::AppResult<()> {
        // Preference list: at least one entry, none blank. A blank entry is
        // always a config typo; a merely malformed one is left for the
        // resolver's fallible walk to skip.
        if self.models.preference.is_empty() {
            return Err(crate::error::AppError::Config(
                "models.preference must list at least one model identifier".to_string(),
            ));
        }
        for (index, entry) in self.models.preference.iter().enumerate() {
            if entry.trim().is_empty() {
                return Err(crate::error::AppError::Config(format!(
                    "models.preference[{}] is blank",
                    index
                )));
            }
        }

        // base_url must be http(s)
        if !self.models.base_url.starts_with("http://")
            && !self.models.base_url.starts_with("https://")
        {
            return Err(crate::error::AppError::Config(format!(
                "models.base_url '{}' must start with 'http://' or 'https://'",
                self.models.base_url
            )));
        }

        // Credential env var names must be non-blank
        for (index, name) in self.credentials.env.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(crate::error::AppError::Config(format!(
                    "credentials.env[{}] is blank",
                    index
                )));
            }
        }

        // Prompt template must interpolate the passage somewhere
        if !self.prompt.template.contains("{passage}") {
            return Err(crate::error::AppError::Config(
                "prompt.template must contain the '{passage}' placeholder".to_string(),
            ));
        }

        // Request timeout bounds the single blocking remote call
        if self.server.request_timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "server.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_seconds > 300 {
            return Err(crate::error::AppError::Config(format!(
                "server.request_timeout_seconds cannot exceed 300 seconds (5 minutes), got {}",
                self.server.request_timeout_seconds
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = crate::error::AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(toml_str).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            }
        })?;

        config.validate()?;
        Ok(config)
    }
}
