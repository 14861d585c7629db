//! # Render Module
//!
//! Turns the API model into Go source text.
//!
//! Templates are minijinja sources (see `templates/`). They never reach for
//! global state: every helper they call (`tempvar`, `generate_swagger`,
//! `ok_resp`, `version_pkg`, ...) is backed by the [`RenderContext`] the
//! [`Renderer`] was built with, so two renders with equal contexts produce
//! equal output.
//!
//! ```text
//! ApiDescription ─┐
//!                 ├─► Renderer (main.go / controller.go templates) ─► source text
//! RenderContext ──┘
//! ```

mod context;
mod templates;


pub use context::*;
pub use templates::*;
