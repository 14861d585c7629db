//! Logical package identifiers for the output directory.
//!
//! Generated files import the `app` package (and its per-version
//! subpackages) that live next to them, so the generator needs the import
//! path of the output directory.

use std::path::{Component, Path, PathBuf};

use crate::error::{GenerateError, Result};
use crate::naming::version_package;

/// Maps an output directory to the import path of the code inside it.
pub trait PackageResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GenerateError::PathResolution`] if `output_dir` cannot be
    /// related to a package root.
    fn resolve_package_identifier(&self, output_dir: &Path) -> Result<String>;
}

/// How the CLI and config select a resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PackageSource {
    /// Nearest enclosing `go.mod`
    #[default]
    Module,
    /// Relative to `$GOPATH/src`
    Gopath,
    /// Fixed import path
    Fixed(String),
}

impl PackageSource {
    /// Parse the `--package` flag: `module`, `gopath` or an import path.
    pub fn parse(s: &str) -> Self {
        match s {
            "module" => PackageSource::Module,
            "gopath" => PackageSource::Gopath,
            other => PackageSource::Fixed(other.to_string()),
        }
    }

    pub fn build(&self, gopath: Option<&str>) -> Box<dyn PackageResolver> {
        match self {
            PackageSource::Module => Box::new(GoModuleResolver),
            PackageSource::Gopath => Box::new(GoPathResolver::new(gopath.unwrap_or_default())),
            PackageSource::Fixed(path) => Box::new(FixedPackage(path.clone())),
        }
    }
}

/// Resolves through the nearest `go.mod` at or above the output directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoModuleResolver;

impl PackageResolver for GoModuleResolver {
    fn resolve_package_identifier(&self, output_dir: &Path) -> Result<String> {
        let mut dir = Some(output_dir);
        while let Some(current) = dir {
            let go_mod = current.join("go.mod");
            if go_mod.is_file() {
                let content = std::fs::read_to_string(&go_mod)
                    .map_err(|e| GenerateError::write(&go_mod, e))?;
                let module = module_path(&content).ok_or_else(|| GenerateError::PathResolution {
                    path: go_mod.clone(),
                    reason: "go.mod has no module directive".to_string(),
                })?;
                let rel = relative_slash_path(output_dir, current)?;
                return Ok(join_import(&module, &rel));
            }
            dir = current.parent();
        }
        Err(GenerateError::PathResolution {
            path: output_dir.to_path_buf(),
            reason: "no go.mod found in the output directory or any parent".to_string(),
        })
    }
}

/// Resolves relative to `$GOPATH/src`.
#[derive(Debug, Clone)]
pub struct GoPathResolver {
    gopath: PathBuf,
}

impl GoPathResolver {
    /// `gopath` may be a list; only its first entry is used.
    pub fn new(gopath: &str) -> Self {
        let first = std::env::split_paths(gopath).next().unwrap_or_default();
        Self { gopath: first }
    }
}

impl PackageResolver for GoPathResolver {
    fn resolve_package_identifier(&self, output_dir: &Path) -> Result<String> {
        if self.gopath.as_os_str().is_empty() {
            return Err(GenerateError::PathResolution {
                path: output_dir.to_path_buf(),
                reason: "GOPATH is not set".to_string(),
            });
        }
        relative_slash_path(output_dir, &self.gopath.join("src"))
    }
}

/// Uses a caller-supplied import path.
#[derive(Debug, Clone)]
pub struct FixedPackage(pub String);

impl PackageResolver for FixedPackage {
    fn resolve_package_identifier(&self, _output_dir: &Path) -> Result<String> {
        Ok(self.0.trim_end_matches('/').to_string())
    }
}

/// Import paths of the packages the generated files refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    root: String,
    target_package: String,
}

impl PackageLayout {
    pub fn new(root: impl Into<String>, target_package: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            target_package: target_package.into(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Generated contexts and mount functions for the default version.
    pub fn app(&self) -> String {
        join_import(&self.root, &self.target_package)
    }

    pub fn version(&self, version: &str) -> String {
        join_import(&self.app(), &version_package(version))
    }

    pub fn swagger(&self) -> String {
        join_import(&self.root, "swagger")
    }
}

fn module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let name = rest.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

fn relative_slash_path(path: &Path, base: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(base)
        .map_err(|_| GenerateError::PathResolution {
            path: path.to_path_buf(),
            reason: format!("not inside {}", base.display()),
        })?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

fn join_import(base: &str, rel: &str) -> String {
    match (base.is_empty(), rel.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => rel.to_string(),
        (false, false) => format!("{}/{}", base.trim_end_matches('/'), rel),
    }
}
