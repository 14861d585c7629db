use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{load_config, resolve_config_path, GeneratorConfig, RuntimeEnv};
use crate::generator::{FormatterKind, GoFmt, Generator, PackageSource, SourceFormatter};
use crate::model::load_api;
use crate::render::TemplateSet;

/// Command-line interface for scaffoldgen
#[derive(Parser)]
#[command(name = "scaffoldgen")]
#[command(version, about = "goa service scaffold generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate main.go and controller scaffolds from an API model
    Generate {
        /// Path to the API model (YAML or JSON)
        #[arg(short, long)]
        design: PathBuf,

        /// Output directory for the generated files
        #[arg(short, long)]
        output: PathBuf,

        /// Replace files that already exist
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Service name; defaults to the API name
        #[arg(long)]
        app_name: Option<String>,

        /// Command being generated; the spec controller is mounted only for
        /// `swagger` or when unset
        #[arg(long)]
        command: Option<String>,

        /// Package holding the generated contexts (default: app)
        #[arg(long)]
        target_package: Option<String>,

        /// Formatter applied to every generated file
        #[arg(long, value_enum)]
        formatter: Option<FormatterKind>,

        /// Import path derivation: `module`, `gopath`, or a fixed import path
        #[arg(long)]
        package: Option<String>,

        /// Directory with template overrides
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Path to scaffoldgen.toml
        /// If not provided, will auto-detect alongside the API model
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show which files and controllers a model produces
    Inspect {
        /// Path to the API model (YAML or JSON)
        #[arg(short, long)]
        design: PathBuf,
    },
}

/// Execute the parsed command.
///
/// # Errors
///
/// Returns an error if the model or config cannot be loaded, or if
/// generation fails (after rolling back).
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let env = RuntimeEnv::from_env();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Generate {
            design,
            output,
            force,
            app_name,
            command,
            target_package,
            formatter,
            package,
            templates,
            config,
        } => {
            let mut settings = match resolve_config_path(config.as_deref(), &design) {
                Some(path) => {
                    tracing::info!(config = %path.display(), "loading config");
                    load_config(&path)?
                        .with_context(|| format!("Config not found: {}", path.display()))?
                }
                None => GeneratorConfig::default(),
            };
            apply_overrides(
                &mut settings,
                Overrides {
                    force,
                    app_name,
                    command,
                    target_package,
                    formatter,
                    package,
                    templates,
                },
            );
            let written = run_generate(&design, &output, &settings, &env)?;
            for path in written {
                writeln!(out, "{}", path.display())?;
            }
        }
        Commands::Inspect { design } => {
            let api = load_api(&design)?;
            for file in Generator::default().plan(&api) {
                match &file.resource {
                    Some(resource) => writeln!(
                        out,
                        "{}\t{}\t{}",
                        file.file_name,
                        resource,
                        file.controllers.join(", ")
                    )?,
                    None => writeln!(out, "{}", file.file_name)?,
                }
            }
        }
    }
    Ok(())
}

/// Flag values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub force: bool,
    pub app_name: Option<String>,
    pub command: Option<String>,
    pub target_package: Option<String>,
    pub formatter: Option<FormatterKind>,
    pub package: Option<String>,
    pub templates: Option<PathBuf>,
}

pub fn apply_overrides(config: &mut GeneratorConfig, overrides: Overrides) {
    if overrides.force {
        config.force = Some(true);
    }
    if overrides.app_name.is_some() {
        config.app_name = overrides.app_name;
    }
    if overrides.command.is_some() {
        config.command = overrides.command;
    }
    if overrides.target_package.is_some() {
        config.target_package = overrides.target_package;
    }
    if overrides.formatter.is_some() {
        config.formatter = overrides.formatter;
    }
    if overrides.package.is_some() {
        config.package = overrides.package;
    }
    if overrides.templates.is_some() {
        config.templates = overrides.templates;
    }
}

/// Build a generator from merged settings and run it.
///
/// # Errors
///
/// Propagates model, template and generation failures.
pub fn run_generate(
    design: &Path,
    output: &Path,
    settings: &GeneratorConfig,
    env: &RuntimeEnv,
) -> anyhow::Result<Vec<PathBuf>> {
    let api = load_api(design)?;
    let mut generator = Generator::new(settings.generator_options())
        .with_formatter(build_formatter(settings.formatter.unwrap_or_default(), env))
        .with_resolver(settings.package_source().build(env.gopath.as_deref()));
    if let Some(dir) = &settings.templates {
        generator = generator.with_templates(TemplateSet::from_dir(dir)?);
    }
    if settings.package_source() == PackageSource::Gopath && env.gopath.is_none() {
        tracing::warn!("--package gopath given but GOPATH is not set");
    }
    let written = generator
        .generate(&api, output, settings.force.unwrap_or(false))
        .with_context(|| format!("Failed to generate into {}", output.display()))?;
    Ok(written)
}

fn build_formatter(kind: FormatterKind, env: &RuntimeEnv) -> Box<dyn SourceFormatter> {
    match (kind, &env.gofmt_bin) {
        (FormatterKind::Gofmt, Some(bin)) => Box::new(GoFmt::new(bin.clone())),
        (kind, _) => kind.build(),
    }
}
