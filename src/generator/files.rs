use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{GenerateError, Result};

/// Decide whether `path` should be (re)generated.
///
/// An existing file is left alone unless `force` is set, in which case it is
/// removed so the new content starts from scratch.
///
/// # Errors
///
/// Returns [`GenerateError::Write`] if a forced removal fails.
pub fn should_write(path: &Path, force: bool) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    if !force {
        tracing::warn!(path = %path.display(), "skipping existing file (use --force to overwrite)");
        return Ok(false);
    }
    std::fs::remove_file(path).map_err(|e| GenerateError::write(path, e))?;
    tracing::debug!(path = %path.display(), "removed existing file for regeneration");
    Ok(true)
}

/// Paths written during the current `generate` call.
///
/// Cloning shares the underlying list; the rollback watcher holds one clone.
#[derive(Debug, Clone, Default)]
pub struct GeneratedFiles {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl GeneratedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` before its content is written, so a failed write still
    /// gets cleaned up.
    pub fn track(&self, path: impl Into<PathBuf>) {
        self.lock().push(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take the tracked list, leaving the set empty.
    pub fn take(&self) -> Vec<PathBuf> {
        std::mem::take(&mut *self.lock())
    }

    /// Delete every tracked path and clear the set.
    ///
    /// Deletion is best effort: a file that is already gone is ignored and
    /// any other failure is logged before moving on to the next path.
    pub fn rollback(&self) {
        let paths = self.take();
        if paths.is_empty() {
            return;
        }
        tracing::error!(files = paths.len(), "rolling back generated files");
        for path in &paths {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove generated file")
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        // a panic while holding the lock cannot leave the Vec half-updated
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped rollback for one `generate` call.
///
/// While armed, dropping the guard rolls back every tracked file, and (on
/// unix) a termination signal does the same before the process exits.
/// [`RollbackGuard::disarm`] on the success path releases both.
pub struct RollbackGuard {
    files: GeneratedFiles,
    armed: bool,
    #[cfg(unix)]
    registration: Option<signals::Registration>,
}

impl RollbackGuard {
    /// Arm the guard over `files`.
    ///
    /// When the signal watcher cannot be installed generation still proceeds;
    /// synchronous failures are rolled back either way.
    pub fn arm(files: GeneratedFiles) -> Self {
        #[cfg(unix)]
        let registration = match signals::register(files.clone()) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!(error = %e, "could not install signal watcher; interruption will not roll back");
                None
            }
        };
        Self {
            files,
            armed: true,
            #[cfg(unix)]
            registration,
        }
    }

    /// Release the guard and hand back the tracked paths.
    pub fn disarm(mut self) -> Vec<PathBuf> {
        self.armed = false;
        self.deregister();
        self.files.take()
    }

    fn deregister(&mut self) {
        #[cfg(unix)]
        drop(self.registration.take());
    }
}

impl Drop for RollbackGuard {
    fn drop(&mut self) {
        self.deregister();
        if self.armed {
            self.files.rollback();
        }
    }
}

/// Process-wide termination signal handling.
///
/// One watcher thread is installed on first use and lives for the rest of
/// the process. Each armed guard registers its file set. A signal that
/// arrives while sets are registered rolls all of them back and exits with
/// `128 + signal`; one that arrives while none are registered gets the
/// default disposition, as if no handler had ever been installed.
#[cfg(unix)]
mod signals {
    use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::iterator::Signals;
    use signal_hook::low_level::emulate_default_handler;
    use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

    use super::GeneratedFiles;

    const TERMINATION_SIGNALS: [i32; 4] = [SIGINT, SIGTERM, SIGHUP, SIGQUIT];

    struct InFlight {
        next_id: u64,
        runs: Vec<(u64, GeneratedFiles)>,
    }

    static IN_FLIGHT: Mutex<InFlight> = Mutex::new(InFlight {
        next_id: 0,
        runs: Vec::new(),
    });

    static WATCHER: OnceLock<Result<(), String>> = OnceLock::new();

    /// Deregisters its file set when dropped.
    pub(super) struct Registration(u64);

    impl Drop for Registration {
        fn drop(&mut self) {
            in_flight().runs.retain(|(id, _)| *id != self.0);
        }
    }

    pub(super) fn register(files: GeneratedFiles) -> Result<Registration, String> {
        WATCHER.get_or_init(spawn_watcher).clone()?;
        let mut in_flight = in_flight();
        let id = in_flight.next_id;
        in_flight.next_id += 1;
        in_flight.runs.push((id, files));
        Ok(Registration(id))
    }

    fn in_flight() -> MutexGuard<'static, InFlight> {
        IN_FLIGHT.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_watcher() -> Result<(), String> {
        let mut signals = Signals::new(TERMINATION_SIGNALS).map_err(|e| e.to_string())?;
        std::thread::Builder::new()
            .name("scaffoldgen-rollback".to_string())
            .spawn(move || {
                for sig in signals.forever() {
                    let runs = std::mem::take(&mut in_flight().runs);
                    if runs.is_empty() {
                        if let Err(e) = emulate_default_handler(sig) {
                            tracing::warn!(signal = sig, error = %e, "failed to apply default signal action");
                        }
                        continue;
                    }
                    tracing::error!(signal = sig, runs = runs.len(), "interrupted during generation");
                    for (_, files) in &runs {
                        files.rollback();
                    }
                    std::process::exit(128 + sig);
                }
            })
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::fs;

    #[test]
    fn test_should_write_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        assert!(should_write(&path, false).unwrap());
        assert!(should_write(&path, true).unwrap());
    }

    #[test]
    fn test_should_write_existing_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        fs::write(&path, "package main // edited\n").unwrap();
        assert!(!should_write(&path, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "package main // edited\n");
    }

    #[test]
    fn test_should_write_force_removes_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        fs::write(&path, "package main\n").unwrap();
        assert!(should_write(&path, true).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_rollback_removes_tracked_and_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        let written = dir.path().join("a.go");
        let never_written = dir.path().join("b.go");
        let untracked = dir.path().join("c.go");
        fs::write(&written, "a").unwrap();
        fs::write(&untracked, "c").unwrap();

        let files = GeneratedFiles::new();
        files.track(&never_written);
        files.track(&written);
        files.rollback();

        assert!(!written.exists());
        assert!(untracked.exists());
        assert!(files.is_empty());
    }

    #[test]
    fn test_guard_drop_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.go");
        let files = GeneratedFiles::new();
        {
            let _guard = RollbackGuard::arm(files.clone());
            files.track(&path);
            fs::write(&path, "a").unwrap();
        }
        assert!(!path.exists());
        assert!(files.is_empty());
    }

    #[test]
    fn test_guard_disarm_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.go");
        let files = GeneratedFiles::new();
        let guard = RollbackGuard::arm(files.clone());
        files.track(&path);
        fs::write(&path, "a").unwrap();

        let kept = guard.disarm();
        assert_eq!(kept, vec![path.clone()]);
        assert!(path.exists());
    }
}
