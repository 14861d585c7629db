use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::ResolutionError;
use crate::model::{find_media_type, ActionDescription, ApiDescription, MediaTypeDescription};
use crate::naming;

/// Command name that selects the spec-serving controller.
pub const SWAGGER_COMMAND: &str = "swagger";

/// The success response an action method sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    /// Response name; the generated context has a send method of that name
    pub name: String,
    /// Whether a view selector must be passed when sending
    pub has_multiple_views: bool,
    /// Construction expression prefix: `&app.Bottle` or `app.BottleCollection`
    pub type_ref: String,
}

/// Helpers exposed to the templates for one `generate` call.
///
/// The temp-var counter is shared with the owning
/// [`Generator`](crate::generator::Generator), so numbering continues across
/// calls on the same generator and starts over with a new one.
#[derive(Debug)]
pub struct RenderContext {
    counter: Arc<AtomicUsize>,
    command: Option<String>,
    target_package: String,
    media_types: Vec<MediaTypeDescription>,
}

impl RenderContext {
    pub fn new(
        api: &ApiDescription,
        counter: Arc<AtomicUsize>,
        target_package: impl Into<String>,
        command: Option<String>,
    ) -> Self {
        Self {
            counter,
            command,
            target_package: target_package.into(),
            media_types: api.media_types.clone(),
        }
    }

    /// `c` on the first call, then `c2`, `c3`, ...
    pub fn next_temp_var(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        if n == 1 {
            "c".to_string()
        } else {
            format!("c{n}")
        }
    }

    /// Whether the entrypoint should also mount the spec-serving controller.
    pub fn wants_auxiliary_spec(&self) -> bool {
        match self.command.as_deref() {
            None | Some("") => true,
            Some(cmd) => cmd == SWAGGER_COMMAND,
        }
    }

    pub fn target_package(&self) -> &str {
        &self.target_package
    }

    pub fn version_package(&self, version: &str) -> String {
        naming::version_package(version)
    }

    /// Package holding the generated contexts for `version`.
    pub fn package_for(&self, version: &str) -> String {
        if version.is_empty() {
            self.target_package.clone()
        } else {
            naming::version_package(version)
        }
    }

    /// Success response of `action`, or `None` when it has none that resolves.
    pub fn resolve_success_response(
        &self,
        action: &ActionDescription,
        version: &str,
    ) -> Option<SuccessResponse> {
        match self.try_resolve_success_response(action, version) {
            Ok(ok) => Some(ok),
            Err(err) => {
                tracing::debug!(action = %action.name, version, reason = %err, "rendering action without success response");
                None
            }
        }
    }

    /// Resolve the first 200 response of `action` against the media type
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] when there is no 200 response or its
    /// media type cannot be found.
    pub fn try_resolve_success_response(
        &self,
        action: &ActionDescription,
        version: &str,
    ) -> Result<SuccessResponse, ResolutionError> {
        let ok = action
            .responses
            .iter()
            .find(|r| r.status == 200)
            .ok_or_else(|| ResolutionError::NoSuccessResponse {
                action: action.name.clone(),
            })?;
        let identifier = ok
            .media_type
            .as_deref()
            .ok_or_else(|| ResolutionError::MissingMediaType {
                action: action.name.clone(),
                response: ok.name.clone(),
            })?;
        let mt = find_media_type(&self.media_types, identifier)
            .ok_or_else(|| ResolutionError::UnknownMediaType {
                action: action.name.clone(),
                identifier: identifier.to_string(),
            })?;

        let qualified = format!("{}.{}", self.package_for(version), mt.go_type_name());
        let type_ref = if mt.by_reference() {
            format!("&{qualified}")
        } else {
            qualified
        };
        Ok(SuccessResponse {
            name: ok.name.clone(),
            has_multiple_views: mt.has_multiple_views(),
            type_ref,
        })
    }
}
