//! Configuration management for fitcheck
//!
//! Provides the configuration model with discovery and precedence:
//! explicit path > `fitcheck.toml` found upward from the current directory
//! > built-in defaults. Supports TOML files with `[provider]` and
//! `[pacing]` sections.
//!
//! Provider credentials never live in the file itself: the config names an
//! environment variable (`api_key_env`) and the backend resolves it at
//! construction time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the configuration file searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "fitcheck.toml";

/// Configuration error with the offending path preserved where known.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("Failed to parse config file {path}: {reason}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Image generation provider settings (`[provider]` section).
///
/// All fields are optional in the file; accessors on [`Config`] apply the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Backend name. Only `"gemini"` ships today.
    pub backend: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Base URL of the provider API.
    pub base_url: Option<String>,
    /// Model identifier passed to the provider.
    pub model: Option<String>,
    /// Per-call timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Request pacing settings (`[pacing]` section).
///
/// The inter-call delay is a rate-limit avoidance policy, not a
/// correctness requirement; tune it to the provider's quota.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Delay between successive provider calls, in milliseconds.
    pub delay_ms: Option<u64>,
}

/// Configuration for fitcheck operations.
///
/// # Discovery
///
/// Use [`Config::discover()`] for CLI-like behavior that searches for
/// `fitcheck.toml` upward from the current directory and falls back to
/// built-in defaults, or [`Config::load()`] with an explicit path.
///
/// # Defaults
///
/// | Value | Default |
/// |-------|---------|
/// | `provider.backend` | `gemini` |
/// | `provider.api_key_env` | `GEMINI_API_KEY` |
/// | `provider.base_url` | Gemini `generativelanguage` v1beta endpoint |
/// | `provider.model` | `gemini-2.5-flash-image-preview` |
/// | `provider.timeout_secs` | 120 (clamped to a 5s minimum) |
/// | `pacing.delay_ms` | 1000 |
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Pacing settings.
    #[serde(default)]
    pub pacing: PacingConfig,
}

impl Config {
    /// Default provider backend name.
    pub const DEFAULT_BACKEND: &'static str = "gemini";

    /// Default environment variable for the provider API key.
    pub const DEFAULT_API_KEY_ENV: &'static str = "GEMINI_API_KEY";

    /// Default provider base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default model identifier.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash-image-preview";

    /// Default per-call timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Minimum per-call timeout in seconds.
    pub const MIN_TIMEOUT_SECS: u64 = 5;

    /// Default inter-call pacing delay in milliseconds.
    pub const DEFAULT_PACING_DELAY_MS: u64 = 1000;

    /// Load configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Discover configuration by searching for `fitcheck.toml` upward from
    /// the current directory. Falls back to built-in defaults if no file
    /// is found.
    ///
    /// # Errors
    ///
    /// Returns an error only if a file is found but cannot be read or
    /// parsed; absence of a file is not an error.
    pub fn discover() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Self::discover_from(&cwd)
    }

    /// Discovery rooted at an explicit directory. Exposed separately so
    /// tests can run against a temp directory instead of the process cwd.
    ///
    /// # Errors
    ///
    /// Same conditions as [`discover`](Self::discover).
    pub fn discover_from(start: &Path) -> Result<Self, ConfigError> {
        let mut dir = Some(start);
        while let Some(current) = dir {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
            dir = current.parent();
        }
        Ok(Self::default())
    }

    /// A minimal configuration for tests: built-in defaults, no file IO.
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Self::default()
    }

    /// Effective backend name.
    #[must_use]
    pub fn backend(&self) -> &str {
        self.provider.backend.as_deref().unwrap_or(Self::DEFAULT_BACKEND)
    }

    /// Effective API key environment variable name.
    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.provider
            .api_key_env
            .as_deref()
            .unwrap_or(Self::DEFAULT_API_KEY_ENV)
    }

    /// Effective provider base URL, with any trailing slash removed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.provider
            .base_url
            .as_deref()
            .unwrap_or(Self::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Effective model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        self.provider.model.as_deref().unwrap_or(Self::DEFAULT_MODEL)
    }

    /// Effective per-call timeout, clamped to the minimum.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        let secs = self
            .provider
            .timeout_secs
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS)
            .max(Self::MIN_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Effective inter-call pacing delay.
    #[must_use]
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing.delay_ms.unwrap_or(Self::DEFAULT_PACING_DELAY_MS))
    }

    /// Validate numeric and structural sanity of the configuration.
    ///
    /// Backend name validity is enforced by the provider factory, which
    /// owns the list of shipped backends.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for values that can never work,
    /// like an empty model name or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(model) = &self.provider.model
            && model.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "provider.model must not be empty".to_string(),
            ));
        }

        if let Some(0) = self.provider.timeout_secs {
            return Err(ConfigError::Invalid(
                "provider.timeout_secs must be at least 1".to_string(),
            ));
        }

        if let Some(env) = &self.provider.api_key_env
            && env.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "provider.api_key_env must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
