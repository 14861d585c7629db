//! # Generator Module
//!
//! The generator turns an [`ApiDescription`](crate::model::ApiDescription)
//! into the scaffold of a goa service: one `main.go` that mounts every
//! controller, and one `<resource>.go` per resource holding a controller per
//! supported API version.
//!
//! ## Overview
//!
//! ```text
//! ApiDescription → Renderer (templates + RenderContext) → SourceFormatter → disk
//! ```
//!
//! 1. **Package resolution** - the output directory is mapped to its Go
//!    import path ([`PackageResolver`]) so generated files can import `app`
//!    and its version packages
//! 2. **Entrypoint** - `main.go` is rendered unless it already exists
//! 3. **Controllers** - each resource gets `<to_file_stem(name)>.go`, again
//!    only if absent
//! 4. **Normalization** - every file goes through a [`SourceFormatter`]
//!    before it is written
//!
//! ## File Lifecycle
//!
//! Generated files are scaffolds that developers edit, so an existing file
//! is never touched unless `force` is passed. Every file written during a
//! run is tracked; if any step fails, or the process receives a termination
//! signal mid-run, all of them are deleted again. A run either completes or
//! leaves the output directory as it found it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scaffoldgen::generator::{Generator, GeneratorOptions};
//! use scaffoldgen::model::load_api;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let api = load_api(Path::new("design/cellar.yaml"))?;
//! let generator = Generator::new(GeneratorOptions::default());
//! let written = generator.generate(&api, Path::new("/go/src/cellar"), false)?;
//! for path in written {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

mod files;
mod format;
mod generate;
mod package;


pub use files::*;
pub use format::*;
pub use generate::*;
pub use package::*;
