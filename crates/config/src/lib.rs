//! Configuration loading, validation, and management for Heimdall.
//!
//! Loads configuration from `~/.heimdall/config.toml` with environment
//! variable overrides. Each backend table is merged over built-in defaults,
//! so a file only needs to name what it changes.

use heimdall_core::backend::{BackendConfig, BackendId, BackendOptions, LOCAL_ENDPOINT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.heimdall/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-backend credentials, endpoints and options
    #[serde(default)]
    pub backends: BackendsConfig,
}

/// Static configuration of every dispatchable backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "BackendsFile")]
pub struct BackendsConfig {
    pub claude: BackendConfig,
    pub deepseek: BackendConfig,
    pub aider: BackendConfig,
}

impl BackendsConfig {
    /// Configuration for a backend. `None` for `multi`, which is never dispatched.
    pub fn get(&self, backend: BackendId) -> Option<&BackendConfig> {
        match backend {
            BackendId::Claude => Some(&self.claude),
            BackendId::Deepseek => Some(&self.deepseek),
            BackendId::Aider => Some(&self.aider),
            BackendId::Multi => None,
        }
    }

    fn get_mut(&mut self, backend: BackendId) -> Option<&mut BackendConfig> {
        match backend {
            BackendId::Claude => Some(&mut self.claude),
            BackendId::Deepseek => Some(&mut self.deepseek),
            BackendId::Aider => Some(&mut self.aider),
            BackendId::Multi => None,
        }
    }

    /// Iterate in routing declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (BackendId, &BackendConfig)> {
        BackendId::DISPATCHABLE
            .into_iter()
            .filter_map(move |id| self.get(id).map(|c| (id, c)))
    }
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            claude: default_backend(BackendId::Claude),
            deepseek: default_backend(BackendId::Deepseek),
            aider: default_backend(BackendId::Aider),
        }
    }
}

/// Built-in defaults for a backend.
pub fn default_backend(backend: BackendId) -> BackendConfig {
    match backend {
        BackendId::Claude => BackendConfig::new("", "https://api.anthropic.com/v1/messages").with_options(
            BackendOptions {
                temperature: Some(0.7),
                max_output_tokens: Some(4096),
                model_version: Some("claude-3-sonnet-20240229".into()),
                ..BackendOptions::default()
            },
        ),
        BackendId::Deepseek => BackendConfig::new("", "https://api.deepseek.com/v1/chat/completions").with_options(
            BackendOptions {
                temperature: Some(0.7),
                max_output_tokens: Some(4096),
                model_version: Some("deepseek-chat".into()),
                ..BackendOptions::default()
            },
        ),
        BackendId::Aider | BackendId::Multi => {
            let mut options = BackendOptions::default();
            options
                .custom
                .insert("use_local_execution".into(), serde_json::Value::Bool(true));
            BackendConfig::new("", LOCAL_ENDPOINT).with_options(options)
        }
    }
}

/// The on-disk shape of `[backends]`: every field optional.
#[derive(Default, Deserialize)]
struct BackendsFile {
    #[serde(default)]
    claude: Option<BackendOverride>,
    #[serde(default)]
    deepseek: Option<BackendOverride>,
    #[serde(default)]
    aider: Option<BackendOverride>,
}

#[derive(Default, Deserialize)]
struct BackendOverride {
    #[serde(default, alias = "api_key")]
    credential: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    options: BackendOptions,
}

impl BackendOverride {
    fn merge_into(self, mut base: BackendConfig) -> BackendConfig {
        if let Some(credential) = self.credential {
            base.credential = credential;
        }
        if let Some(endpoint) = self.endpoint.filter(|e| !e.is_empty()) {
            base.endpoint = endpoint;
        }
        let options = &mut base.options;
        if self.options.temperature.is_some() {
            options.temperature = self.options.temperature;
        }
        if self.options.max_output_tokens.is_some() {
            options.max_output_tokens = self.options.max_output_tokens;
        }
        if self.options.model_version.is_some() {
            options.model_version = self.options.model_version;
        }
        options.custom.extend(self.options.custom);
        base
    }
}

impl From<BackendsFile> for BackendsConfig {
    fn from(file: BackendsFile) -> Self {
        let merge = |over: Option<BackendOverride>, id: BackendId| {
            let base = default_backend(id);
            match over {
                Some(o) => o.merge_into(base),
                None => base,
            }
        };
        Self {
            claude: merge(file.claude, BackendId::Claude),
            deepseek: merge(file.deepseek, BackendId::Deepseek),
            aider: merge(file.aider, BackendId::Aider),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.heimdall/config.toml).
    ///
    /// Credentials left empty by the file are taken from the environment:
    /// - `HEIMDALL_CLAUDE_API_KEY`, then `ANTHROPIC_API_KEY`
    /// - `HEIMDALL_DEEPSEEK_API_KEY`, then `DEEPSEEK_API_KEY`
    /// - `HEIMDALL_AIDER_API_KEY`
    ///
    /// `HEIMDALL_AIDER_ENDPOINT` always overrides the aider endpoint.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file path, applying environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        config.warn_missing_credentials();
        Ok(config)
    }

    /// Log a warning for every backend that cannot be dispatched yet.
    /// Returns how many were reported.
    fn warn_missing_credentials(&self) -> usize {
        let mut missing = 0;
        for (backend, result) in self.credential_report() {
            if let Err(reason) = result {
                tracing::warn!(backend = %backend, "{reason}");
                missing += 1;
            }
        }
        missing
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Fill empty credentials (and the aider endpoint) from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let credential_vars: [(BackendId, &[&str]); 3] = [
            (BackendId::Claude, &["HEIMDALL_CLAUDE_API_KEY", "ANTHROPIC_API_KEY"]),
            (BackendId::Deepseek, &["HEIMDALL_DEEPSEEK_API_KEY", "DEEPSEEK_API_KEY"]),
            (BackendId::Aider, &["HEIMDALL_AIDER_API_KEY"]),
        ];

        for (backend, vars) in credential_vars {
            let Some(config) = self.backends.get_mut(backend) else {
                continue;
            };
            if !config.credential.is_empty() {
                continue;
            }
            if let Some(key) = vars.iter().find_map(|v| lookup(v).filter(|k| !k.is_empty())) {
                config.credential = key;
            }
        }

        if let Some(endpoint) = lookup("HEIMDALL_AIDER_ENDPOINT").filter(|e| !e.is_empty()) {
            self.backends.aider.endpoint = endpoint;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".heimdall")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    ///
    /// Missing credentials are not an error here; they surface when a command
    /// is dispatched to that backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (backend, config) in self.backends.iter() {
            if config.endpoint.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "backends.{backend}.endpoint must not be empty"
                )));
            }
            if let Some(t) = config.options.temperature {
                if !(0.0..=2.0).contains(&t) {
                    return Err(ConfigError::ValidationError(format!(
                        "backends.{backend}.options.temperature must be between 0.0 and 2.0"
                    )));
                }
            }
            if config.options.max_output_tokens == Some(0) {
                return Err(ConfigError::ValidationError(format!(
                    "backends.{backend}.options.max_output_tokens must be > 0"
                )));
            }
        }
        Ok(())
    }

    /// Check every backend's credential invariant without failing.
    pub fn credential_report(&self) -> Vec<(BackendId, Result<(), String>)> {
        self.backends
            .iter()
            .map(|(id, config)| (id, config.check(id)))
            .collect()
    }

    /// A copy safe to print: non-empty credentials are masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for backend in BackendId::DISPATCHABLE {
            if let Some(b) = config.backends.get_mut(backend) {
                if !b.credential.is_empty() {
                    b.credential = "[REDACTED]".into();
                }
            }
        }
        config
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for heimdall_core::Error {
    fn from(err: ConfigError) -> Self {
        heimdall_core::Error::Config {
            message: err.to_string(),
        }
    }
}
