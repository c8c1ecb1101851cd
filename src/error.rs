//! The handler-facing error type. Fail-open (spec §7) is applied at the call
//! site where each fallible operation happens, inside `commands/*.rs` — a
//! `Result<_, EngineError>` is folded into "no reply" via `.ok()` or a
//! `let Some(..) = .. else { return None }` right where it occurs, so by the
//! time a handler's `run()` returns to `main.rs` the fail-open decision has
//! already been made. Only the Stop Gate's lock-contention path and a
//! malformed CLI invocation exit non-zero.

use std::fmt;

use crate::git::GitError;

#[derive(Debug)]
pub enum EngineError {
    Git(GitError),
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The Stop Gate's checkpoint lock is already held by another process.
    LockContention,
    ConfigInvalid(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Git(e) => write!(f, "{e}"),
            EngineError::Io(e) => write!(f, "io error: {e}"),
            EngineError::Json(e) => write!(f, "json error: {e}"),
            EngineError::LockContention => write!(f, "checkpoint lock is held by another process"),
            EngineError::ConfigInvalid(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<GitError> for EngineError {
    fn from(e: GitError) -> Self {
        EngineError::Git(e)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_wraps_inner_git_error() {
        assert_eq!(
            EngineError::Git(GitError::NotAGitRepo).to_string(),
            "not a git repository"
        );
    }

    #[test]
    fn lock_contention_has_a_distinct_message() {
        assert_eq!(
            EngineError::LockContention.to_string(),
            "checkpoint lock is held by another process"
        );
    }
}
