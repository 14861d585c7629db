//! Error types surfaced by the generator.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for fallible generator operations.
pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// Why a `generate` run failed.
///
/// Every variant aborts the run; all files written so far are rolled back
/// before the error reaches the caller.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A template failed to compile. This is a defect in the generator (or a
    /// supplied template override), never in the API model.
    #[error("template `{name}` failed to compile: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// A compiled template failed while rendering a file.
    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// The output directory could not be mapped to a logical package.
    #[error("cannot derive package for {}: {reason}", path.display())]
    PathResolution { path: PathBuf, reason: String },

    /// Filesystem failure while removing or writing a file.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The normalize/format step rejected the generated source.
    #[error("failed to format {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl GenerateError {
    /// True for errors that point at the generator itself rather than at
    /// the model or the environment.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GenerateError::Template { .. })
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Write {
            path: path.into(),
            source,
        }
    }
}

/// Why an action has no usable success response.
///
/// These never abort generation: the action is rendered as a bare
/// `return nil` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("action `{action}` has no 200 response")]
    NoSuccessResponse { action: String },

    #[error("response `{response}` of action `{action}` has no media type")]
    MissingMediaType { action: String, response: String },

    #[error("media type `{identifier}` used by action `{action}` is not registered")]
    UnknownMediaType { action: String, identifier: String },
}
