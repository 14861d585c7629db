//! # Model Module
//!
//! Read-only description of an API: resources, their actions and responses,
//! the declared API versions and the media type registry. The tree is built
//! by the design parser and deserialized here as-is; the generator never
//! mutates it.

mod load;
mod types;


pub use load::*;
pub use types::*;
