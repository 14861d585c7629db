use anyhow::Context as _;
use minijinja::value::{Value, ViaDeserialize};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use super::context::RenderContext;
use crate::error::{GenerateError, Result};
use crate::model::{ActionDescription, ApiDescription, ControllerVersionBinding, ResourceDescription};
use crate::naming;

/// Registered name of the shared `package`/`import` header partial.
pub const HEADER_TEMPLATE: &str = "header.go";
/// Registered name of the entrypoint template.
pub const ENTRYPOINT_TEMPLATE: &str = "main.go";
/// Registered name of the controller template.
pub const CONTROLLER_TEMPLATE: &str = "controller.go";

const BUILTIN_HEADER: &str = include_str!("../../templates/header.go.j2");
const BUILTIN_ENTRYPOINT: &str = include_str!("../../templates/main.go.j2");
const BUILTIN_CONTROLLER: &str = include_str!("../../templates/controller.go.j2");

/// Template sources used by the renderer.
///
/// The default set is compiled into the binary. [`TemplateSet::from_dir`]
/// lets a project override any of them with a `<name>.j2` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub header: String,
    pub entrypoint: String,
    pub controller: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            header: BUILTIN_HEADER.to_string(),
            entrypoint: BUILTIN_ENTRYPOINT.to_string(),
            controller: BUILTIN_CONTROLLER.to_string(),
        }
    }
}

impl TemplateSet {
    /// Load overrides from `dir`, keeping the built-in source for any
    /// template that has no file there.
    ///
    /// # Errors
    ///
    /// Returns an error if an override exists but cannot be read.
    pub fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut set = Self::default();
        for (name, slot) in [
            (HEADER_TEMPLATE, &mut set.header),
            (ENTRYPOINT_TEMPLATE, &mut set.entrypoint),
            (CONTROLLER_TEMPLATE, &mut set.controller),
        ] {
            let path = dir.join(format!("{name}.j2"));
            if path.exists() {
                *slot = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read template override: {}", path.display()))?;
                tracing::info!(template = name, path = %path.display(), "using template override");
            }
        }
        Ok(set)
    }
}

/// One Go import line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
}

impl ImportSpec {
    pub fn simple(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
        }
    }

    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            path: path.into(),
        }
    }

    /// The import as it appears inside an `import ( ... )` block.
    pub fn code(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias} \"{}\"", self.path),
            None => format!("\"{}\"", self.path),
        }
    }
}

/// Data for the entrypoint template.
#[derive(Debug, Serialize)]
pub struct EntrypointData<'a> {
    /// Service name passed to `goa.New`
    pub name: &'a str,
    pub api: &'a ApiDescription,
    pub imports: Vec<String>,
}

/// Data for one controller file.
#[derive(Debug, Serialize)]
pub struct ControllerData<'a> {
    pub resource: &'a ResourceDescription,
    pub bindings: Vec<ControllerVersionBinding<'a>>,
    pub imports: Vec<String>,
}

impl<'a> ControllerData<'a> {
    pub fn new(resource: &'a ResourceDescription, imports: &[ImportSpec]) -> Self {
        Self {
            resource,
            bindings: resource.bindings(),
            imports: imports.iter().map(ImportSpec::code).collect(),
        }
    }
}

/// Compiled templates bound to one [`RenderContext`].
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Compile `templates` and register the context helpers.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Template`] if any template fails to compile.
    pub fn new(templates: &TemplateSet, ctx: Arc<RenderContext>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        for (name, source) in [
            (HEADER_TEMPLATE, &templates.header),
            (ENTRYPOINT_TEMPLATE, &templates.entrypoint),
            (CONTROLLER_TEMPLATE, &templates.controller),
        ] {
            env.add_template_owned(name, source.clone())
                .map_err(|source| GenerateError::Template {
                    name: name.to_string(),
                    source,
                })?;
        }

        register_helpers(&mut env, ctx);
        Ok(Self { env })
    }

    /// # Errors
    ///
    /// Returns [`GenerateError::Render`] if the template fails while rendering.
    pub fn render_entrypoint(&self, path: &Path, data: &EntrypointData<'_>) -> Result<String> {
        self.render(ENTRYPOINT_TEMPLATE, path, data)
    }

    /// # Errors
    ///
    /// Returns [`GenerateError::Render`] if the template fails while rendering.
    pub fn render_controller(&self, path: &Path, data: &ControllerData<'_>) -> Result<String> {
        self.render(CONTROLLER_TEMPLATE, path, data)
    }

    fn render<S: Serialize>(&self, name: &str, path: &Path, data: &S) -> Result<String> {
        let err = |source| GenerateError::Render {
            path: path.to_path_buf(),
            source,
        };
        let tmpl = self.env.get_template(name).map_err(err)?;
        tmpl.render(data).map_err(err)
    }
}

fn register_helpers(env: &mut Environment<'static>, ctx: Arc<RenderContext>) {
    let c = Arc::clone(&ctx);
    env.add_function("tempvar", move || c.next_temp_var());

    let c = Arc::clone(&ctx);
    env.add_function("generate_swagger", move || c.wants_auxiliary_spec());

    let c = Arc::clone(&ctx);
    env.add_function("target_pkg", move || c.target_package().to_string());

    let c = Arc::clone(&ctx);
    env.add_function("version_pkg", move |version: String| c.version_package(&version));

    let c = Arc::clone(&ctx);
    env.add_function("pkg_for", move |version: String| c.package_for(&version));

    env.add_function("goify", |name: String, first_upper: bool| {
        naming::goify(&name, first_upper)
    });

    env.add_function("mangle", |resource: String, version: String| {
        naming::mangle(&resource, &version)
    });

    env.add_function(
        "ok_resp",
        move |action: ViaDeserialize<ActionDescription>, version: String| {
            Value::from_serialize(ctx.resolve_success_response(&action.0, &version))
        },
    );
}
