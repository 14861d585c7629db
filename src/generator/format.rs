use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Environment variable overriding the `gofmt` binary.
pub const GOFMT_BIN_ENV: &str = "SCAFFOLDGEN_GOFMT_BIN";

/// Normalizes generated source text before it is persisted.
pub trait SourceFormatter: Send + Sync {
    /// Return the normalized form of `source`, destined for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be normalized. The generator
    /// treats this like a failed write and rolls back.
    fn format(&self, path: &Path, source: &str) -> anyhow::Result<String>;
}

/// Which formatter a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    /// Pipe through `gofmt`
    Gofmt,
    /// Built-in whitespace normalization
    #[default]
    Normalize,
    /// Write rendered text untouched
    None,
}

impl FormatterKind {
    pub fn build(self) -> Box<dyn SourceFormatter> {
        match self {
            FormatterKind::Gofmt => Box::new(GoFmt::from_env()),
            FormatterKind::Normalize => Box::new(Normalize),
            FormatterKind::None => Box::new(Passthrough),
        }
    }
}

/// Runs `gofmt` over the source through stdin/stdout.
#[derive(Debug, Clone)]
pub struct GoFmt {
    bin: String,
}

impl GoFmt {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// `gofmt` from `PATH`, or the binary named by
    /// `SCAFFOLDGEN_GOFMT_BIN` so tests can swap it without touching `PATH`.
    pub fn from_env() -> Self {
        Self::new(std::env::var(GOFMT_BIN_ENV).unwrap_or_else(|_| "gofmt".to_string()))
    }
}

impl SourceFormatter for GoFmt {
    fn format(&self, path: &Path, source: &str) -> anyhow::Result<String> {
        let mut child = Command::new(&self.bin)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.bin))?;
        {
            let mut stdin = child
                .stdin
                .take()
                .context("gofmt stdin was not captured")?;
            stdin
                .write_all(source.as_bytes())
                .with_context(|| format!("Failed to pipe {} into {}", path.display(), self.bin))?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            anyhow::bail!(
                "{} failed on {}: {}",
                self.bin,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        String::from_utf8(output.stdout).context("gofmt produced invalid UTF-8")
    }
}

/// Whitespace cleanup that needs no external tool.
///
/// Strips trailing whitespace, collapses blank-line runs, removes blank
/// lines directly inside braces and ends the file with one newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalize;

impl SourceFormatter for Normalize {
    fn format(&self, _path: &Path, source: &str) -> anyhow::Result<String> {
        let mut lines: Vec<&str> = Vec::new();
        for line in source.lines().map(str::trim_end) {
            let blank = line.is_empty();
            let prev = lines.last().copied();
            if blank && (prev.is_none() || prev == Some("") || prev.is_some_and(|p| p.ends_with('{'))) {
                continue;
            }
            if line.trim_start().starts_with('}') && prev == Some("") {
                lines.pop();
            }
            lines.push(line);
        }
        while lines.last() == Some(&"") {
            lines.pop();
        }
        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }
}

/// Writes the rendered text as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl SourceFormatter for Passthrough {
    fn format(&self, _path: &Path, source: &str) -> anyhow::Result<String> {
        Ok(source.to_string())
    }
}
