//! # scaffoldgen
//!
//! **scaffoldgen** turns a declarative API model into the starting source of
//! a [goa](https://github.com/raphael/goa) service: a `main.go` that wires
//! every controller into the service, and one controller file per resource
//! with a stub method per action.
//!
//! ## Architecture
//!
//! - **[`model`]** - The API model the generator reads (resources, versions,
//!   actions, responses, media types) and its YAML/JSON loader
//! - **[`naming`]** - Pure identifier transforms: file stems, Go identifiers,
//!   version packages, controller names
//! - **[`render`]** - The render context (temp vars, package names, success
//!   response lookup) and the minijinja templates that use it
//! - **[`generator`]** - Orchestration and the file lifecycle: skip existing
//!   files, track what was written, roll back on failure or signal
//! - **[`config`]** - `scaffoldgen.toml` and environment settings
//! - **[`cli`]** - The `scaffoldgen` command line
//! - **[`telemetry`]** - `tracing` subscriber setup
//!
//! ## Generation Flow
//!
//! ```text
//! load_api ─► Generator::generate
//!               ├─ PackageResolver      output dir → Go import path
//!               ├─ Renderer             main.go, <resource>.go
//!               ├─ SourceFormatter      gofmt / normalize
//!               └─ GeneratedFiles       track, rollback on error
//! ```
//!
//! Existing files are left alone unless `force` is set, so re-running the
//! generator after editing a scaffold is safe.
//!
//! ## Example
//!
//! ```rust,no_run
//! use scaffoldgen::generator::{FixedPackage, Generator, GeneratorOptions};
//! use scaffoldgen::model::load_api;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let api = load_api(Path::new("design/cellar.yaml"))?;
//! let written = Generator::new(GeneratorOptions::default())
//!     .with_resolver(Box::new(FixedPackage("github.com/acme/cellar".into())))
//!     .generate(&api, Path::new("cellar"), false)?;
//! println!("wrote {} files", written.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod naming;
pub mod render;
pub mod telemetry;

pub use error::{GenerateError, ResolutionError};
pub use generator::{Generator, GeneratorOptions};
pub use model::{load_api, ApiDescription};
