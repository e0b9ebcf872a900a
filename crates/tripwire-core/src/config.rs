//! Configuration types for tripwire.
//!
//! [`Config::load`] reads `~/.config/tripwire/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::types::FrameworkVersion;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[framework]
version = "7.1"

[notifier]
include_params = true

[[rescue_responses]]
exception = "ActionController::RoutingError"
status = 404

[[rescue_responses]]
exception = "AbstractController::ActionNotFound"
status = 404

[[rescue_responses]]
exception = "ActionController::MethodNotAllowed"
status = 405

[[rescue_responses]]
exception = "ActionController::UnknownHttpMethod"
status = 405

[[rescue_responses]]
exception = "ActionController::NotImplemented"
status = 501

[[rescue_responses]]
exception = "ActionController::UnknownFormat"
status = 406

[[rescue_responses]]
exception = "ActionController::MissingExactTemplate"
status = 406

[[rescue_responses]]
exception = "ActionController::InvalidAuthenticityToken"
status = 422

[[rescue_responses]]
exception = "ActionController::InvalidCrossOriginRequest"
status = 422

[[rescue_responses]]
exception = "ActionDispatch::Http::Parameters::ParseError"
status = 400

[[rescue_responses]]
exception = "ActionController::BadRequest"
status = 400

[[rescue_responses]]
exception = "ActionController::ParameterMissing"
status = 400

[[rescue_responses]]
exception = "Rack::QueryParser::ParameterTypeError"
status = 400

[[rescue_responses]]
exception = "Rack::QueryParser::InvalidParameterError"
status = 400

[[rescue_responses]]
exception = "ActiveRecord::RecordNotFound"
status = 404

[[rescue_responses]]
exception = "ActiveRecord::StaleObjectError"
status = 409

[[rescue_responses]]
exception = "ActiveRecord::RecordInvalid"
status = 422

[[rescue_responses]]
exception = "ActiveRecord::RecordNotSaved"
status = 422
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/tripwire/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub framework: FrameworkConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub rescue_responses: Vec<RescueResponse>,
}

/// `[framework]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameworkConfig {
    /// Host framework version; decides the event time unit.
    #[serde(default = "default_framework_version")]
    pub version: FrameworkVersion,
}

fn default_framework_version() -> FrameworkVersion { FrameworkVersion::new(7, 1) }

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            version: default_framework_version(),
        }
    }
}

/// `[notifier]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Whether [`TracingNotifier`](crate::TracingNotifier) logs notice params.
    #[serde(default = "default_include_params")]
    pub include_params: bool,
}

fn default_include_params() -> bool { true }

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            include_params: default_include_params(),
        }
    }
}

/// One `[[rescue_responses]]` entry: exception class → rendered status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RescueResponse {
    pub exception: String,
    pub status: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/tripwire/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::from_path(&path)
    }

    /// Load an explicit file layered on top of the built-in defaults. A
    /// missing file yields the defaults.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("tripwire")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
