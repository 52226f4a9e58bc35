// Configuration File Support
//
// This module provides configuration loading for webhook-activator.
// Supports TOML format with environment variable overrides.
// Configuration files are loaded from the XDG config directory:
// ~/.config/webhook-activator/config.toml
//
// Environment variables use the GitHub Actions input naming
// (INPUT_TARGET_ORGS, INPUT_SOURCE_GITHUB_PAT, ...) so the binary can run
// as an action step without a config file.

use crate::github::{ClientOptions, Credentials, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No organizations configured (set target orgs or INPUT_TARGET_ORGS)")]
    NoOrganizations,

    #[error("No credentials configured: provide a personal access token or a GitHub App id, private key and installation id")]
    MissingCredentials,

    #[error("Incomplete GitHub App credentials: missing {0}")]
    IncompleteApp(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Organizations and credentials the sweep runs against
    pub target: GithubConfig,

    /// Fallback values for anything unset in `target`
    pub source: GithubConfig,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Exit non-zero when any activation failed
    pub fail_on_errors: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// One side (target or source) of the GitHub settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct GithubConfig {
    /// Organization names, comma or newline separated
    pub orgs: Option<String>,

    /// Personal access token
    pub pat: Option<String>,

    /// GitHub App id
    pub app_id: Option<String>,

    /// GitHub App private key (PEM)
    pub app_private_key: Option<String>,

    /// GitHub App installation id
    pub app_installation_id: Option<String>,

    /// REST API base URL (GitHub Enterprise Server: https://host/api/v3)
    pub api_url: Option<String>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent to GitHub
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

/// Settings the sweep runs with, after fallbacks are applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub organizations: Vec<String>,
    pub credentials: Credentials,
    pub api_url: String,
    pub client: ClientOptions,
    pub fail_on_errors: bool,
}

impl Config {
    /// Load configuration from the default XDG config directory
    ///
    /// If the config file does not exist, returns default configuration
    /// with environment overrides applied.
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::config_path())
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the result fails validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!("Loaded configuration from {:?}", path);
            config
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        let config = config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/webhook-activator/config.toml` on Linux
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "webhook-activator", "webhook-activator") {
            proj_dirs.config_dir().join("config.toml")
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config").join("webhook-activator").join("config.toml")
        }
    }

    /// Apply environment variable overrides to the configuration
    ///
    /// Environment variables take precedence over config file values:
    /// - INPUT_{TARGET,SOURCE}_ORGS
    /// - INPUT_{TARGET,SOURCE}_GITHUB_PAT
    /// - INPUT_{TARGET,SOURCE}_GITHUB_APP_ID
    /// - INPUT_{TARGET,SOURCE}_GITHUB_APP_PRIVATE_KEY
    /// - INPUT_{TARGET,SOURCE}_GITHUB_APP_INSTALLATION_ID
    /// - INPUT_{TARGET,SOURCE}_GITHUB_API_URL
    /// - WEBHOOK_ACTIVATOR_LOG_LEVEL
    /// - WEBHOOK_ACTIVATOR_LOG_FORMAT
    fn apply_env_overrides(mut self) -> Self {
        if let Some(level) = env_value("WEBHOOK_ACTIVATOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env_value("WEBHOOK_ACTIVATOR_LOG_FORMAT") {
            self.logging.format = format;
        }

        self.target.apply_env_overrides("TARGET");
        self.source.apply_env_overrides("SOURCE");
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Invalid log format: {}. Must be one of: json, pretty, compact",
                    self.logging.format
                )))
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid("HTTP timeout must be > 0".to_string()));
        }

        Ok(())
    }

    /// Convert log level string to tracing::Level
    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .to_lowercase()
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("Failed to parse log level: {}", e)))
    }

    /// Apply source fallbacks and pick a credential
    ///
    /// Each target value falls back to its source counterpart. A complete
    /// GitHub App identity is preferred over a personal access token.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let pick = |target: &Option<String>, source: &Option<String>| {
            non_empty(target).or_else(|| non_empty(source))
        };

        let organizations = parse_orgs(
            &pick(&self.target.orgs, &self.source.orgs).unwrap_or_default(),
        );
        if organizations.is_empty() {
            return Err(ConfigError::NoOrganizations);
        }

        let app_id = pick(&self.target.app_id, &self.source.app_id);
        let private_key = pick(&self.target.app_private_key, &self.source.app_private_key);
        let installation_id = pick(
            &self.target.app_installation_id,
            &self.source.app_installation_id,
        );
        let pat = pick(&self.target.pat, &self.source.pat);

        let credentials = match (app_id, private_key, installation_id, pat) {
            (Some(app_id), Some(private_key), Some(installation_id), _) => Credentials::App {
                app_id,
                private_key,
                installation_id,
            },
            (_, _, _, Some(pat)) => Credentials::Token(pat),
            (None, None, None, None) => return Err(ConfigError::MissingCredentials),
            (app_id, private_key, installation_id, None) => {
                let missing: Vec<&str> = [
                    ("app id", app_id.is_none()),
                    ("app private key", private_key.is_none()),
                    ("app installation id", installation_id.is_none()),
                ]
                .iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| *name)
                .collect();
                return Err(ConfigError::IncompleteApp(missing.join(", ")));
            }
        };

        let api_url = pick(&self.target.api_url, &self.source.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut client = ClientOptions {
            timeout: Duration::from_secs(self.http.timeout_secs),
            ..ClientOptions::default()
        };
        if let Some(user_agent) = non_empty(&self.http.user_agent) {
            client.user_agent = user_agent;
        }

        Ok(ResolvedConfig {
            organizations,
            credentials,
            api_url,
            client,
            fail_on_errors: self.fail_on_errors,
        })
    }
}

impl GithubConfig {
    fn apply_env_overrides(&mut self, side: &str) {
        let var = |name: &str| env_value(&format!("INPUT_{}_{}", side, name));

        if let Some(orgs) = var("ORGS") {
            self.orgs = Some(orgs);
        }
        if let Some(pat) = var("GITHUB_PAT") {
            self.pat = Some(pat);
        }
        if let Some(app_id) = var("GITHUB_APP_ID") {
            self.app_id = Some(app_id);
        }
        if let Some(key) = var("GITHUB_APP_PRIVATE_KEY") {
            self.app_private_key = Some(key);
        }
        if let Some(installation_id) = var("GITHUB_APP_INSTALLATION_ID") {
            self.app_installation_id = Some(installation_id);
        }
        if let Some(api_url) = var("GITHUB_API_URL") {
            self.api_url = Some(api_url);
        }
    }
}

/// Split an organization list on commas and newlines
///
/// Order and duplicates are kept; blank entries are dropped.
pub fn parse_orgs(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|org| !org.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
