//! Git plumbing: the Tree Snapshotter (C1) and the subprocess layer everything
//! else in the engine is built on.
//!
//! `Repository` never touches the real index, the real `HEAD`, or the real
//! stash. Snapshotting uses a private temporary index file pointed to by
//! `GIT_INDEX_FILE`.

mod parse;

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

pub use parse::{FileDelta, FileStatus};

/// Git's well-known empty-tree SHA (`git hash-object -t tree /dev/null`).
pub const EMPTY_TREE_SHA: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Everything that can go wrong shelling out to git.
#[derive(Debug, Clone)]
pub enum GitError {
    NotAGitRepo,
    GitUnavailable(String),
    CommandFailed(String),
    ParseError(String),
    TreeWriteFailed(String),
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitError::NotAGitRepo => write!(f, "not a git repository"),
            GitError::GitUnavailable(e) => write!(f, "git is not available: {e}"),
            GitError::CommandFailed(e) => write!(f, "{e}"),
            GitError::ParseError(e) => write!(f, "could not parse git output: {e}"),
            GitError::TreeWriteFailed(e) => write!(f, "could not snapshot the working tree: {e}"),
        }
    }
}

impl std::error::Error for GitError {}

impl GitError {
    /// Human-facing, colorized rendering for direct CLI invocation
    /// diagnostics (`bumper score`), matching the teacher's `styled()`
    /// convention for git errors.
    pub fn styled(&self) -> String {
        color_print::cformat!("<red,bold>git error:</> {}", self)
    }
}

/// A thin wrapper around `git` invocations rooted at a working directory.
#[derive(Debug, Clone)]
pub struct Repository {
    cwd: PathBuf,
}

impl Repository {
    /// A repository rooted at the current process's working directory.
    pub fn current() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// A repository rooted at an arbitrary path (a worktree, typically).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { cwd: path.into() }
    }

    pub fn root(&self) -> &Path {
        &self.cwd
    }

    /// Run `git <args>` in this repository's directory, returning stdout.
    ///
    /// `extra_env` is applied on top of the inherited environment — used to
    /// point `GIT_INDEX_FILE` at a private temporary index.
    pub fn run_command_with_env(
        &self,
        args: &[&str],
        extra_env: &[(&str, &OsStr)],
    ) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.cwd);
        for (k, v) in extra_env {
            cmd.env(k, v);
        }

        log::debug!("git {}", args.join(" "));

        let output = cmd
            .output()
            .map_err(|e| GitError::GitUnavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(GitError::CommandFailed(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| GitError::ParseError(format!("non-utf8 git output: {e}")))
    }

    pub fn run_command(&self, args: &[&str]) -> Result<String, GitError> {
        self.run_command_with_env(args, &[])
    }

    /// Whether `self.cwd` is inside a git working tree at all.
    pub fn is_git_repo(&self) -> bool {
        self.run_command(&["rev-parse", "--git-dir"]).is_ok()
    }

    /// The private, per-worktree git directory (`.git` for the main worktree,
    /// `.git/worktrees/<name>` for a linked one). Session state lives here —
    /// see the Session Store's layout decision in DESIGN.md.
    pub fn private_git_dir(&self) -> Result<PathBuf, GitError> {
        let out = self.run_command(&["rev-parse", "--absolute-git-dir"])?;
        Ok(PathBuf::from(out.trim()))
    }

    /// The path `git rev-parse --git-path <name>` resolves to, relative to
    /// the private per-worktree git dir. Used to anchor session state.
    pub fn git_path(&self, name: &str) -> Result<PathBuf, GitError> {
        let out = self.run_command(&["rev-parse", "--git-path", name])?;
        let rel = out.trim();
        if Path::new(rel).is_absolute() {
            Ok(PathBuf::from(rel))
        } else {
            Ok(self.cwd.join(rel))
        }
    }

    /// `HEAD^{tree}`, or `None` if there is no commit yet (fresh repo).
    pub fn head_tree(&self) -> Result<Option<String>, GitError> {
        match self.run_command(&["rev-parse", "--verify", "-q", "HEAD^{tree}"]) {
            Ok(out) => Ok(Some(out.trim().to_string())),
            Err(_) => Ok(None),
        }
    }

    /// `HEAD`, or `None` if there is no commit yet.
    pub fn head_sha(&self) -> Result<Option<String>, GitError> {
        match self.run_command(&["rev-parse", "--verify", "-q", "HEAD"]) {
            Ok(out) => Ok(Some(out.trim().to_string())),
            Err(_) => Ok(None),
        }
    }

    /// Current branch name, or empty string if detached (matches the session
    /// record's `baseline_branch` convention).
    pub fn current_branch(&self) -> Result<String, GitError> {
        let out = self.run_command(&["branch", "--show-current"])?;
        Ok(out.trim().to_string())
    }

    /// Does the working tree (tracked + unstaged + untracked) match
    /// `HEAD^{tree}` exactly?
    ///
    /// This is the "auto-reset" condition: the user committed or reverted
    /// externally, cleaning the tree back to what HEAD describes.
    pub fn working_tree_matches_head(&self) -> Result<bool, GitError> {
        let Some(head_tree) = self.head_tree()? else {
            return Ok(self.snapshot()? == EMPTY_TREE_SHA);
        };
        Ok(self.snapshot()? == head_tree)
    }

    /// Snapshot the working tree (tracked + unstaged + untracked-non-ignored)
    /// as a git tree object, without mutating the real index.
    ///
    /// 1. Point `GIT_INDEX_FILE` at a fresh temp file.
    /// 2. Seed it from `HEAD^{tree}` if `HEAD` resolves, else start empty.
    /// 3. `git add -u` to stage tracked modifications into the temp index.
    /// 4. Enumerate untracked, non-ignored files and add them too.
    /// 5. `git write-tree`, then delete the temp index on every exit path.
    pub fn snapshot(&self) -> Result<String, GitError> {
        if !self.is_git_repo() {
            return Err(GitError::NotAGitRepo);
        }

        let dir = self.private_git_dir().unwrap_or_else(|_| self.cwd.clone());
        let temp_index = tempfile::Builder::new()
            .prefix(".bumper-index-")
            .tempfile_in(&dir)
            .map_err(|e| GitError::TreeWriteFailed(e.to_string()))?;
        let temp_index_path = temp_index.path().to_path_buf();
        // Closed immediately: git wants to create/own the index file itself.
        drop(temp_index);
        let result = self.snapshot_with_index(&temp_index_path);
        let _ = std::fs::remove_file(&temp_index_path);
        result
    }

    fn snapshot_with_index(&self, index_path: &Path) -> Result<String, GitError> {
        let index_env = index_path.as_os_str();
        let env = &[("GIT_INDEX_FILE", index_env)];

        if let Some(head_tree) = self.head_tree()? {
            self.run_command_with_env(&["read-tree", &head_tree], env)?;
        }

        // Stage tracked modifications (including deletions) into the temp index.
        self.run_command_with_env(&["add", "-u"], env)?;

        // Enumerate and stage untracked, non-ignored files.
        let untracked = self.run_command(&["ls-files", "--others", "--exclude-standard", "-z"])?;
        for path in untracked.split('\0').filter(|p| !p.is_empty()) {
            self.run_command_with_env(&["add", "--", path], env)?;
        }

        let tree = self.run_command_with_env(&["write-tree"], env)?;
        Ok(tree.trim().to_string())
    }

    /// Per-file numstat + status of the diff between two tree-ish objects,
    /// with renames disabled so a rename scores as delete+add.
    pub fn diff_tree_stats(
        &self,
        baseline: &str,
        current: &str,
    ) -> Result<Vec<FileDelta>, GitError> {
        if baseline == current {
            return Ok(Vec::new());
        }

        let numstat = self.run_command(&[
            "diff-tree",
            "-r",
            "--no-renames",
            "--numstat",
            baseline,
            current,
        ])?;
        let statuses = self.run_command(&[
            "diff-tree",
            "-r",
            "--no-renames",
            "--name-status",
            baseline,
            current,
        ])?;

        parse::combine_numstat_and_status(&numstat, &statuses)
    }

    /// `git diff --quiet HEAD` — true if the working tree has any change
    /// relative to `HEAD` (used by the Status Renderer's dirty indicator).
    pub fn is_dirty(&self) -> Result<bool, GitError> {
        let mut cmd = Command::new("git");
        cmd.args(["diff", "--quiet", "HEAD"]).current_dir(&self.cwd);
        let status = cmd
            .status()
            .map_err(|e| GitError::GitUnavailable(e.to_string()))?;
        match status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(GitError::CommandFailed(
                "git diff --quiet HEAD failed".to_string(),
            )),
        }
    }

    /// The tracked config file path, `<root>/.bumper-lanes.json`.
    pub fn tracked_config_path(&self) -> Result<PathBuf, GitError> {
        let out = self.run_command(&["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(out.trim()).join(".bumper-lanes.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_error_display_is_human_readable() {
        let err = GitError::CommandFailed("git status failed: fatal: x".to_string());
        assert_eq!(err.to_string(), "git status failed: fatal: x");
    }

    #[test]
    fn not_a_git_repo_message() {
        assert_eq!(GitError::NotAGitRepo.to_string(), "not a git repository");
    }

    fn fixture_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::at(dir.path());
        Command::new("git")
            .args(["init", "-q"])
            .current_dir(dir.path())
            .status()
            .unwrap();
        (dir, repo)
    }

    #[test]
    fn empty_repo_snapshots_to_the_canonical_empty_tree() {
        let (_dir, repo) = fixture_repo();
        assert_eq!(repo.snapshot().unwrap(), EMPTY_TREE_SHA);
    }

    #[test]
    fn snapshot_is_idempotent_with_no_intervening_change() {
        let (dir, repo) = fixture_repo();
        std::fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        let first = repo.snapshot().unwrap();
        let second = repo.snapshot().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_changes_when_an_untracked_file_changes() {
        let (dir, repo) = fixture_repo();
        std::fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        let before = repo.snapshot().unwrap();
        std::fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        let after = repo.snapshot().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn snapshot_leaves_the_real_index_untouched() {
        let (dir, repo) = fixture_repo();
        std::fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        let real_index = dir.path().join(".git").join("index");
        assert!(!real_index.exists());
        repo.snapshot().unwrap();
        // The snapshot stages nothing into the real index: git never creates
        // `.git/index` until something is staged into it directly.
        assert!(!real_index.exists());
    }
}
