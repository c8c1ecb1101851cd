//! The Stop Gate's coarse per-session lock: an mkdir-based advisory lock
//! under the checkpoints directory, serializing concurrent Stop invocations
//! for the same session. `mkdir` is atomic on every filesystem git itself
//! relies on, so this needs no flock/fcntl plumbing.

use std::path::PathBuf;

use crate::error::EngineError;
use crate::git::Repository;

/// A held lock; dropping it releases the lock directory unconditionally,
/// so a panicking handler still releases on unwind.
pub struct StopLock {
    dir: PathBuf,
}

impl StopLock {
    /// Try to acquire the lock for `session_id`. Returns `Ok(None)` (not
    /// `Err`) when the lock is already held — the caller's fail-open policy
    /// decides what that means, per spec §7's `LockContention` category.
    pub fn try_acquire(
        repo: &Repository,
        session_id: &str,
    ) -> Result<Option<StopLock>, EngineError> {
        let dir = super::lock_dir_for(repo, session_id)?;
        if let Some(parent) = dir.parent() {
            super::ensure_dir(parent)?;
        }
        match std::fs::create_dir(&dir) {
            Ok(()) => Ok(Some(StopLock { dir })),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for StopLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir(&self.dir) {
            log::warn!("failed to release stop lock {}: {e}", self.dir.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::at(dir.path());
        std::process::Command::new("git")
            .args(["init", "-q"])
            .current_dir(dir.path())
            .status()
            .unwrap();
        (dir, repo)
    }

    #[test]
    fn second_acquire_fails_while_first_is_held() {
        let (_dir, repo) = fixture_repo();
        let first = StopLock::try_acquire(&repo, "s1").unwrap();
        assert!(first.is_some());
        let second = StopLock::try_acquire(&repo, "s1").unwrap();
        assert!(second.is_none());
        drop(first);
        let third = StopLock::try_acquire(&repo, "s1").unwrap();
        assert!(third.is_some());
    }

    #[test]
    fn different_sessions_do_not_contend() {
        let (_dir, repo) = fixture_repo();
        let a = StopLock::try_acquire(&repo, "s1").unwrap();
        let b = StopLock::try_acquire(&repo, "s2").unwrap();
        assert!(a.is_some());
        assert!(b.is_some());
    }
}
