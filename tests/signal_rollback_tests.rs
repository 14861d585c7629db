#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Termination signals are delivered to a re-executed copy of this test
//! binary, so the parent can observe how the child exits.

mod common;

use common::{cellar_api, generator, listing};
use scaffoldgen::generator::SourceFormatter;
use scaffoldgen::model::ApiDescription;
use signal_hook::consts::SIGTERM;
use signal_hook::low_level::raise;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const CHILD_DIR_ENV: &str = "SCAFFOLDGEN_SIGNAL_CHILD_DIR";
const CHILD_MODE_ENV: &str = "SCAFFOLDGEN_SIGNAL_CHILD_MODE";

/// Raises SIGTERM while formatting the `raise_on`-th file, then waits to be
/// terminated.
struct RaisingFormatter {
    calls: AtomicUsize,
    raise_on: usize,
}

impl SourceFormatter for RaisingFormatter {
    fn format(&self, _path: &Path, source: &str) -> anyhow::Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.raise_on {
            raise(SIGTERM)?;
            std::thread::sleep(Duration::from_secs(10));
            anyhow::bail!("still running after SIGTERM");
        }
        Ok(source.to_string())
    }
}

fn run_child(test: &str, mode: &str, dir: &Path) -> ExitStatus {
    Command::new(std::env::current_exe().unwrap())
        .args(["--exact", test, "--nocapture", "--test-threads=1"])
        .env(CHILD_DIR_ENV, dir)
        .env(CHILD_MODE_ENV, mode)
        .status()
        .unwrap()
}

fn child_dir(mode: &str) -> Option<PathBuf> {
    let wanted = std::env::var(CHILD_MODE_ENV).ok()?;
    (wanted == mode).then(|| PathBuf::from(std::env::var_os(CHILD_DIR_ENV).unwrap()))
}

#[test]
fn child_interrupted_mid_generation() {
    let Some(dir) = child_dir("interrupt") else {
        return;
    };
    let gen = generator().with_formatter(Box::new(RaisingFormatter {
        calls: AtomicUsize::new(0),
        raise_on: 2,
    }));
    let _ = gen.generate(&cellar_api(), &dir, false);
    panic!("generate returned after SIGTERM");
}

#[test]
fn child_signalled_after_generation() {
    let Some(dir) = child_dir("idle") else {
        return;
    };
    let api = ApiDescription {
        name: "empty".to_string(),
        ..ApiDescription::default()
    };
    generator().generate(&api, &dir, false).unwrap();
    raise(SIGTERM).unwrap();
    std::thread::sleep(Duration::from_secs(10));
    panic!("survived SIGTERM after generate returned");
}

#[test]
fn test_sigterm_during_generation_rolls_back() {
    if std::env::var_os(CHILD_MODE_ENV).is_some() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let status = run_child("child_interrupted_mid_generation", "interrupt", dir.path());

    // main.go was written before account.go raised the signal.
    assert_eq!(status.code(), Some(128 + SIGTERM));
    assert!(listing(dir.path()).is_empty());
}

#[test]
fn test_sigterm_after_generation_keeps_default_action() {
    if std::env::var_os(CHILD_MODE_ENV).is_some() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let status = run_child("child_signalled_after_generation", "idle", dir.path());

    assert!(status.code().is_none(), "child exited with {status:?}");
    assert!(status.signal().is_some());
    assert_eq!(listing(dir.path()), vec!["main.go".to_string()]);
}
