use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::files::{should_write, GeneratedFiles, RollbackGuard};
use super::format::{Normalize, SourceFormatter};
use super::package::{GoModuleResolver, PackageLayout, PackageResolver};
use crate::error::{GenerateError, Result};
use crate::model::{ApiDescription, ResourceDescription};
use crate::naming::to_file_stem;
use crate::render::{ControllerData, EntrypointData, ImportSpec, RenderContext, Renderer, TemplateSet};

/// Import path of the goa runtime package.
pub const DEFAULT_GOA_IMPORT: &str = "github.com/raphael/goa";
/// Package holding the generated contexts for the default version.
pub const DEFAULT_TARGET_PACKAGE: &str = "app";
/// Extension of every generated file.
pub const SOURCE_EXTENSION: &str = "go";

/// Knobs that shape the generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Service name; the API name is used when unset
    pub app_name: Option<String>,
    pub target_package: String,
    /// Command filter; anything but empty or `swagger` drops the spec controller
    pub command: Option<String>,
    pub goa_import: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            app_name: None,
            target_package: DEFAULT_TARGET_PACKAGE.to_string(),
            command: None,
            goa_import: DEFAULT_GOA_IMPORT.to_string(),
        }
    }
}

/// A file the generator would produce, as reported by [`Generator::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub file_name: String,
    /// Resource rendered into the file; `None` for the entrypoint
    pub resource: Option<String>,
    /// Controller type names, one per version binding
    pub controllers: Vec<String>,
}

/// Generates `main.go` and one controller file per resource.
///
/// The temp-var counter used for mount variables lives here, so a fresh
/// generator always starts at `c`. Running two generators against the same
/// output directory at the same time is not supported.
pub struct Generator {
    options: GeneratorOptions,
    counter: Arc<AtomicUsize>,
    templates: TemplateSet,
    formatter: Box<dyn SourceFormatter>,
    resolver: Box<dyn PackageResolver>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            counter: Arc::new(AtomicUsize::new(0)),
            templates: TemplateSet::default(),
            formatter: Box::new(Normalize),
            resolver: Box::new(GoModuleResolver),
        }
    }

    pub fn with_formatter(mut self, formatter: Box<dyn SourceFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_resolver(mut self, resolver: Box<dyn PackageResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = templates;
        self
    }

    /// Generate into `output_dir` and return every path written, in order.
    ///
    /// Existing files are skipped (and not returned) unless `force` is set.
    /// On any error every file written by this call is deleted before the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] when a template fails to compile or render,
    /// the output package cannot be resolved, or a file cannot be formatted or
    /// written.
    pub fn generate(
        &self,
        api: &ApiDescription,
        output_dir: &Path,
        force: bool,
    ) -> Result<Vec<PathBuf>> {
        let files = GeneratedFiles::new();
        let guard = RollbackGuard::arm(files.clone());
        match self.run(api, output_dir, force, &files) {
            Ok(()) => {
                let written = guard.disarm();
                tracing::info!(files = written.len(), dir = %output_dir.display(), "generation complete");
                Ok(written)
            }
            Err(err) => {
                tracing::error!(error = %err, "generation failed");
                drop(guard);
                Err(err)
            }
        }
    }

    /// File names and controller bindings `generate` would produce, without
    /// touching the filesystem.
    pub fn plan(&self, api: &ApiDescription) -> Vec<PlannedFile> {
        let mut planned = vec![PlannedFile {
            file_name: format!("main.{SOURCE_EXTENSION}"),
            resource: None,
            controllers: Vec::new(),
        }];
        planned.extend(api.resources.iter().map(|res| PlannedFile {
            file_name: controller_file_name(&res.name),
            resource: Some(res.name.clone()),
            controllers: res.bindings().iter().map(|b| b.controller_name()).collect(),
        }));
        planned
    }

    fn run(
        &self,
        api: &ApiDescription,
        output_dir: &Path,
        force: bool,
        files: &GeneratedFiles,
    ) -> Result<()> {
        let output_dir = absolute(output_dir)?;
        let ctx = Arc::new(RenderContext::new(
            api,
            Arc::clone(&self.counter),
            self.options.target_package.clone(),
            self.options.command.clone(),
        ));
        let renderer = Renderer::new(&self.templates, Arc::clone(&ctx))?;

        let root = self.resolver.resolve_package_identifier(&output_dir)?;
        let layout = PackageLayout::new(root, self.options.target_package.clone());
        tracing::debug!(package = layout.root(), "resolved output package");
        fs::create_dir_all(&output_dir).map_err(|e| GenerateError::write(&output_dir, e))?;

        let main_path = output_dir.join(format!("main.{SOURCE_EXTENSION}"));
        if should_write(&main_path, force)? {
            let imports = self.entrypoint_imports(api, &layout, ctx.wants_auxiliary_spec());
            let data = EntrypointData {
                name: self.options.app_name.as_deref().unwrap_or(&api.name),
                api,
                imports: imports.iter().map(ImportSpec::code).collect(),
            };
            self.emit(files, &main_path, || renderer.render_entrypoint(&main_path, &data))?;
        }

        for resource in &api.resources {
            let path = output_dir.join(controller_file_name(&resource.name));
            if !should_write(&path, force)? {
                continue;
            }
            let imports = self.controller_imports(resource, &layout);
            let data = ControllerData::new(resource, &imports);
            self.emit(files, &path, || renderer.render_controller(&path, &data))?;
        }
        Ok(())
    }

    fn emit(
        &self,
        files: &GeneratedFiles,
        path: &Path,
        render: impl FnOnce() -> Result<String>,
    ) -> Result<()> {
        files.track(path);
        let source = render()?;
        let formatted = self
            .formatter
            .format(path, &source)
            .map_err(|source| GenerateError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        fs::write(path, formatted).map_err(|e| GenerateError::write(path, e))?;
        tracing::info!(path = %path.display(), "generated");
        Ok(())
    }

    fn entrypoint_imports(
        &self,
        api: &ApiDescription,
        layout: &PackageLayout,
        wants_spec: bool,
    ) -> Vec<ImportSpec> {
        let mut imports = vec![ImportSpec::simple(&self.options.goa_import)];
        if api.resources.iter().any(ResourceDescription::supports_no_version) {
            imports.push(ImportSpec::simple(layout.app()));
        }
        for ver in api.explicit_versions() {
            if !api.resources.iter().any(|r| r.supports_version(&ver.version)) {
                continue;
            }
            let spec = ImportSpec::simple(layout.version(&ver.version));
            if !imports.contains(&spec) {
                imports.push(spec);
            }
        }
        if wants_spec {
            imports.push(ImportSpec::simple(layout.swagger()));
        }
        imports
    }

    fn controller_imports(
        &self,
        resource: &ResourceDescription,
        layout: &PackageLayout,
    ) -> Vec<ImportSpec> {
        let mut imports = vec![ImportSpec::simple(&self.options.goa_import)];
        if resource.supports_no_version() {
            imports.push(ImportSpec::simple(layout.app()));
        }
        for version in &resource.versions {
            let spec = ImportSpec::simple(layout.version(version));
            if !imports.contains(&spec) {
                imports.push(spec);
            }
        }
        imports
    }
}

/// `<stem>.go` for a resource.
pub fn controller_file_name(resource: &str) -> String {
    format!("{}.{SOURCE_EXTENSION}", to_file_stem(resource))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| GenerateError::write(path, e))?;
    Ok(cwd.join(path))
}
