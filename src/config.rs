//! # Configuration Module
//!
//! Generation settings can live in a `scaffoldgen.toml` next to the API
//! model so repeated runs do not need the same flags:
//!
//! ```toml
//! app_name = "cellar"
//! target_package = "app"
//! command = "main"
//! formatter = "gofmt"
//! package = "github.com/acme/cellar"
//! templates = "design/templates"
//! ```
//!
//! Command-line flags win over file values.
//!
//! ## Environment Variables
//!
//! - `SCAFFOLDGEN_LOG_FORMAT` - `pretty` or `json` (default `pretty`)
//! - `SCAFFOLDGEN_GOFMT_BIN` - `gofmt` binary used by the `gofmt` formatter
//! - `GOPATH` - root used by the `gopath` package resolver
//! - `RUST_LOG` - log filter (default `info`)

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::generator::{
    FormatterKind, GeneratorOptions, PackageSource, DEFAULT_TARGET_PACKAGE, GOFMT_BIN_ENV,
};
use crate::telemetry::LogFormat;

/// Name of the auto-detected config file.
pub const CONFIG_FILE_NAME: &str = "scaffoldgen.toml";

/// Settings loaded from `scaffoldgen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub target_package: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub formatter: Option<FormatterKind>,
    /// `module`, `gopath` or a fixed import path
    #[serde(default)]
    pub package: Option<String>,
    /// Directory with template overrides, relative to the config file
    #[serde(default)]
    pub templates: Option<PathBuf>,
    #[serde(default)]
    pub force: Option<bool>,
}

impl GeneratorConfig {
    pub fn generator_options(&self) -> GeneratorOptions {
        let defaults = GeneratorOptions::default();
        GeneratorOptions {
            app_name: self.app_name.clone(),
            target_package: self
                .target_package
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET_PACKAGE.to_string()),
            command: self.command.clone(),
            goa_import: defaults.goa_import,
        }
    }

    pub fn package_source(&self) -> PackageSource {
        self.package
            .as_deref()
            .map(PackageSource::parse)
            .unwrap_or_default()
    }
}

/// Load a config file.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let mut config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    if let (Some(templates), Some(base)) = (config.templates.as_mut(), path.parent()) {
        if templates.is_relative() {
            *templates = base.join(&*templates);
        }
    }
    Ok(Some(config))
}

/// Config path to use: the explicit one if given, else `scaffoldgen.toml`
/// alongside the model file when present.
pub fn resolve_config_path(explicit: Option<&Path>, model_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = model_path.parent()?.join(CONFIG_FILE_NAME);
    candidate.exists().then_some(candidate)
}

/// Process environment relevant to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub log_format: LogFormat,
    pub gofmt_bin: Option<String>,
    pub gopath: Option<String>,
}

impl RuntimeEnv {
    pub fn from_env() -> Self {
        let log_format = env::var("SCAFFOLDGEN_LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Pretty);
        let gofmt_bin = env::var(GOFMT_BIN_ENV).ok().filter(|v| !v.is_empty());
        let gopath = env::var("GOPATH").ok().filter(|v| !v.is_empty());
        RuntimeEnv {
            log_format,
            gofmt_bin,
            gopath,
        }
    }
}
