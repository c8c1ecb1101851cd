//! The Session Store (C3): durable, crash-safe, concurrently-accessed
//! session records, one JSON file per session under the repository's
//! private, per-worktree checkpoints directory.

mod lock;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::git::Repository;

pub use lock::StopLock;

const CHECKPOINTS_DIR: &str = "bumper-checkpoints";

/// The persisted state for one active session (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub session_id: String,
    pub baseline_tree: String,
    pub baseline_branch: String,
    pub threshold_limit: u32,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub stop_triggered: bool,
    #[serde(default)]
    pub paused: bool,
    pub view_mode: String,
    #[serde(default)]
    pub view_opts: String,
    #[serde(default = "default_true")]
    pub show_diff_viz: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl SessionRecord {
    pub fn new(
        session_id: impl Into<String>,
        baseline_tree: impl Into<String>,
        baseline_branch: impl Into<String>,
        threshold_limit: u32,
        view_mode: impl Into<String>,
        view_opts: impl Into<String>,
        show_diff_viz: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            baseline_tree: baseline_tree.into(),
            baseline_branch: baseline_branch.into(),
            threshold_limit,
            score: 0,
            stop_triggered: false,
            paused: false,
            view_mode: view_mode.into(),
            view_opts: view_opts.into(),
            show_diff_viz,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Where session records for `repo` are kept: the repository's private,
/// per-worktree git directory, so a commit in one worktree never resets a
/// sibling worktree's session (see DESIGN.md's Open Question decision).
fn checkpoints_dir(repo: &Repository) -> Result<PathBuf, EngineError> {
    Ok(repo.git_path(CHECKPOINTS_DIR)?)
}

fn session_path(repo: &Repository, session_id: &str) -> Result<PathBuf, EngineError> {
    Ok(checkpoints_dir(repo)?.join(format!("session-{session_id}")))
}

/// Load a session record, or `None` if it does not exist. A malformed file
/// is treated the same as "not found" per the `StateCorrupt` fail-open
/// policy — the caller must not rewrite it on this call.
pub fn load(repo: &Repository, session_id: &str) -> Result<Option<SessionRecord>, EngineError> {
    let path = session_path(repo, session_id)?;
    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_slice(&bytes) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            log::warn!("session record {session_id} is corrupt: {e}");
            Ok(None)
        }
    }
}

/// Atomically persist a session record: write to a sibling temp file in the
/// same directory, then rename over the final path. Never leaves a
/// half-written record visible to a concurrent reader.
pub fn save(repo: &Repository, record: &SessionRecord) -> Result<(), EngineError> {
    let dir = checkpoints_dir(repo)?;
    std::fs::create_dir_all(&dir)?;
    let path = session_path(repo, &record.session_id)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(&serde_json::to_vec(record)?)?;
    tmp.flush()?;
    // `flush()` only empties userspace buffering; without an explicit fsync a
    // crash between here and the rename below can leave a truncated record.
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| EngineError::Io(e.error))?;
    Ok(())
}

/// Best-effort delete; absence is not an error.
pub fn delete(repo: &Repository, session_id: &str) -> Result<(), EngineError> {
    let path = session_path(repo, session_id)?;
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn lock_dir_for(repo: &Repository, session_id: &str) -> Result<PathBuf, EngineError> {
    Ok(checkpoints_dir(repo)?.join(format!("session-{session_id}.lock")))
}

pub(crate) fn ensure_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
