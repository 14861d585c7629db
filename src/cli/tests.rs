//! Unit tests for CLI commands

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::config::{GeneratorConfig, RuntimeEnv};
use crate::generator::FormatterKind;
use crate::telemetry::LogFormat;
use clap::Parser;
use std::fs;

const MODEL: &str = r#"
name: cellar
resources:
  - name: Bottle
    actions:
      - name: show
        responses:
          - name: OK
            status: 200
            media_type: application/vnd.goa.example.bottle+json
  - name: Account
    versions: ["1.0"]
versions:
  - version: ""
  - version: "1.0"
media_types:
  - identifier: application/vnd.goa.example.bottle+json
    views:
      - name: default
      - name: tiny
"#;

fn env() -> RuntimeEnv {
    RuntimeEnv {
        log_format: LogFormat::Pretty,
        gofmt_bin: None,
        gopath: None,
    }
}

#[test]
fn test_generate_command_parse() {
    let cli = Cli::try_parse_from([
        "scaffoldgen",
        "generate",
        "--design",
        "design.yaml",
        "--output",
        "out",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            design,
            output,
            force,
            formatter,
            config,
            ..
        } => {
            assert_eq!(design.to_string_lossy(), "design.yaml");
            assert_eq!(output.to_string_lossy(), "out");
            assert!(!force);
            assert!(formatter.is_none());
            assert!(config.is_none());
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_command_with_flags() {
    let cli = Cli::try_parse_from([
        "scaffoldgen",
        "generate",
        "-d",
        "design.yaml",
        "-o",
        "out",
        "--force",
        "--app-name",
        "vault",
        "--command",
        "main",
        "--formatter",
        "gofmt",
        "--package",
        "github.com/acme/vault",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            force,
            app_name,
            command,
            formatter,
            package,
            ..
        } => {
            assert!(force);
            assert_eq!(app_name.as_deref(), Some("vault"));
            assert_eq!(command.as_deref(), Some("main"));
            assert_eq!(formatter, Some(FormatterKind::Gofmt));
            assert_eq!(package.as_deref(), Some("github.com/acme/vault"));
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_requires_output() {
    assert!(Cli::try_parse_from(["scaffoldgen", "generate", "--design", "d.yaml"]).is_err());
}

#[test]
fn test_inspect_command_parse() {
    let cli = Cli::try_parse_from(["scaffoldgen", "inspect", "--design", "d.json"]).unwrap();
    assert!(matches!(cli.command, Commands::Inspect { .. }));
}

#[test]
fn test_unknown_formatter_rejected() {
    let result = Cli::try_parse_from([
        "scaffoldgen",
        "generate",
        "-d",
        "d.yaml",
        "-o",
        "out",
        "--formatter",
        "rustfmt",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_flags_override_config() {
    let mut config = GeneratorConfig {
        app_name: Some("from-file".to_string()),
        command: Some("swagger".to_string()),
        formatter: Some(FormatterKind::Gofmt),
        ..GeneratorConfig::default()
    };
    apply_overrides(
        &mut config,
        Overrides {
            force: true,
            app_name: Some("from-flag".to_string()),
            ..Overrides::default()
        },
    );
    assert_eq!(config.app_name.as_deref(), Some("from-flag"));
    assert_eq!(config.command.as_deref(), Some("swagger"));
    assert_eq!(config.formatter, Some(FormatterKind::Gofmt));
    assert_eq!(config.force, Some(true));
}

#[test]
fn test_run_generate_writes_scaffold() {
    let dir = tempfile::tempdir().unwrap();
    let design = dir.path().join("design.yaml");
    fs::write(&design, MODEL).unwrap();
    let out = dir.path().join("out");

    let settings = GeneratorConfig {
        package: Some("github.com/acme/cellar".to_string()),
        ..GeneratorConfig::default()
    };
    let written = run_generate(&design, &out, &settings, &env()).unwrap();
    assert_eq!(
        written,
        vec![out.join("main.go"), out.join("bottle.go"), out.join("account.go")]
    );

    let bottle = fs::read_to_string(out.join("bottle.go")).unwrap();
    assert!(bottle.contains("return ctx.OK(res, \"default\")"));

    let account = fs::read_to_string(out.join("account.go")).unwrap();
    assert!(account.contains("AccountV1_0Controller"));
    assert!(account.contains("\"github.com/acme/cellar/app/v1_0\""));

    // Second run finds everything in place.
    assert!(run_generate(&design, &out, &settings, &env()).unwrap().is_empty());
}

#[test]
fn test_run_generate_reports_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_generate(
        &dir.path().join("missing.yaml"),
        dir.path(),
        &GeneratorConfig::default(),
        &env(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("missing.yaml"));
}
