//! # CLI Module
//!
//! Command-line interface for the `scaffoldgen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Scaffold a goa service from an API model:
//!
//! ```bash
//! scaffoldgen generate --design design/cellar.yaml --output ./cellar
//! ```
//!
//! Options:
//! - `--design <FILE>` - API model (YAML or JSON)
//! - `--output <DIR>` - Output directory (created if missing)
//! - `--force` - Replace files that already exist
//! - `--app-name <NAME>` - Service name passed to `goa.New`
//! - `--command <NAME>` - Command being generated; anything but `swagger`
//!   leaves the spec controller unmounted
//! - `--target-package <PKG>` - Package holding the generated contexts
//! - `--formatter <gofmt|normalize|none>` - Post-render formatting
//! - `--package <module|gopath|PATH>` - How the Go import path is derived
//! - `--templates <DIR>` - Directory with `main.go.j2`, `controller.go.j2`
//!   or `header.go.j2` overrides
//! - `--config <FILE>` - Config file (default: `scaffoldgen.toml` next to
//!   the model)
//!
//! Written paths are printed one per line. If anything fails the run is
//! rolled back and the command exits non-zero.
//!
//! ### `inspect`
//!
//! Print the files and controllers a model would produce:
//!
//! ```bash
//! scaffoldgen inspect --design design/cellar.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use scaffoldgen::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run_cli(cli)?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::*;
