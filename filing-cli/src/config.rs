//! `filing.toml` loading.
//!
//! Values come from the file first, then `FILING_*` environment variables,
//! then command-line flags (applied by `main`). A missing file is not an
//! error; every section has defaults.
//!
//! ```toml
//! [service]
//! endpoint = "http://localhost:8000"
//! access_token = "..."
//! timeout_secs = 30
//!
//! [classification]
//! financial_year = "2025-2026"
//!
//! [chart]
//! width = 640
//!
//! [log]
//! level = "info"
//! file = "filing.log"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use filing_core::{Classification, ServiceConfig};
use filing_core::chart::DEFAULT_HEIGHT;

pub const DEFAULT_CONFIG_FILE: &str = "filing.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{var} must be {expected}, got {value:?}")]
    InvalidEnv {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub service: ServiceConfig,
    pub classification: Classification,
    pub chart: ChartConfig,
    pub log: LogConfig,
}

/// Canvas size the chart layouts are computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Append log records to this file as well as stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl CliConfig {
    /// Reads `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Applies `FILING_*` overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("FILING_BACKEND") {
            self.service.backend = v;
        }
        if let Some(v) = lookup("FILING_ENDPOINT") {
            self.service.endpoint = v;
        }
        if let Some(v) = lookup("FILING_ACCESS_TOKEN") {
            self.service.access_token = Some(v);
        }
        if let Some(v) = lookup("FILING_TIMEOUT_SECS") {
            self.service.timeout_secs = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "FILING_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("FILING_LOG_LEVEL") {
            self.log.level = v;
        }
        if let Some(v) = lookup("FILING_LOG_FILE") {
            self.log.file = Some(PathBuf::from(v));
        }
        Ok(())
    }

    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|name| std::env::var(name).ok())
    }
}
