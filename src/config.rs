//! Diagnostic configuration (`contract.toml`).
//!
//! Controls how fatal violations are written before the process aborts.
//! Termination itself is not configurable.
//!
//! The active configuration is process-wide. A host can [`install`] one
//! explicitly; otherwise the first fatal report loads it from the file named
//! by `CONTRACT_CONFIG`, falling back to defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CONTRACT_CONFIG";

static ACTIVE: OnceLock<ContractConfig> = OnceLock::new();

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
///
/// Missing fields use defaults. Missing file → all defaults (no error).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractConfig {
    /// How violations are reported.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

// ---------------------------------------------------------------------------
// DiagnosticsConfig
// ---------------------------------------------------------------------------

/// Diagnostic output settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Format of the line written to stderr.
    #[serde(default)]
    pub format: DiagnosticFormat,

    /// Also emit a `tracing` error event before aborting (default: true).
    #[serde(default = "default_trace")]
    pub trace: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            format: DiagnosticFormat::default(),
            trace: default_trace(),
        }
    }
}

const fn default_trace() -> bool {
    true
}

/// Format of the stderr diagnostic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticFormat {
    /// `<kind>: <file>:<line>: <text>`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for DiagnosticFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A configuration file could not be read or parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    /// The file involved, if the error came from [`ContractConfig::load`].
    pub path: Option<PathBuf>,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "config error in {}: {}", path.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl ContractConfig {
    /// Load configuration from a TOML file.
    ///
    /// - If the file does not exist, returns all defaults (not an error).
    /// - Invalid TOML or unknown fields produce a [`ConfigError`] with the
    ///   offending line.
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors (other than not-found) or parse errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError {
                    path: Some(path.to_owned()),
                    message: format!("could not read file: {e}"),
                });
            }
        };
        Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path.to_owned());
            e
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML or unknown fields.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError {
                path: None,
                message,
            }
        })
    }

    /// Load from the file named by [`CONFIG_ENV`], or defaults if unset.
    ///
    /// # Errors
    /// Returns `ConfigError` if the named file exists but is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }
}

/// Make `config` the process-wide configuration.
///
/// # Errors
/// Fails if a configuration is already active (installed earlier, or loaded
/// by a previous report); the rejected value is handed back.
pub fn install(config: ContractConfig) -> Result<(), ContractConfig> {
    ACTIVE.set(config)
}

/// The process-wide configuration, loading it on first use.
///
/// An invalid file is logged and replaced by defaults, since this runs on
/// the way to an abort and must not fail.
#[must_use]
pub fn current() -> &'static ContractConfig {
    ACTIVE.get_or_init(|| {
        ContractConfig::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring contract configuration");
            ContractConfig::default()
        })
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
