//! Post-Tool Monitor (C7): refresh the cached score after every tool call,
//! emit escalating tier warnings, and detect an assistant-issued
//! `git commit` to auto-reset the baseline.

use std::sync::LazyLock;

use chrono::Utc;

use bumper_lanes::git::Repository;
use bumper_lanes::hook_io::HookRequest;
use bumper_lanes::score::{self, Tier};

use super::load_session_or_none;

const FILE_MODIFICATION_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];
const SHELL_COMMAND_TOOLS: &[&str] = &["Bash", "Shell"];

/// Matches a shell command that actually invokes `git commit`, tolerating
/// `-C <dir>`, `--git-dir=`, `--work-tree=` prefix flags, but not prose that
/// merely contains the word "commit" without a leading `git` invocation.
static GIT_COMMIT_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?x)
        ^\s*
        (?:\w+=\S+\s+)*               # leading env assignments
        git
        (?:\s+-C\s+\S+ | \s+--git-dir=\S+ | \s+--work-tree=\S+)*
        \s+commit(?:\s|$)
        ",
    )
    .expect("static regex is valid")
});

/// Returns `Some(message)` when a stderr warning should be emitted and the
/// process should exit with the host's stderr-routes-to-assistant code.
pub fn run(request: &HookRequest) -> Option<String> {
    let repo = Repository::at(&request.cwd);
    let Some(mut record) = load_session_or_none(&repo, &request.session_id) else {
        return None;
    };

    if FILE_MODIFICATION_TOOLS.contains(&request.tool_name.as_str()) {
        return handle_file_modification(&repo, &mut record);
    }

    if SHELL_COMMAND_TOOLS.contains(&request.tool_name.as_str()) {
        let command = request
            .tool_input
            .get("command")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if GIT_COMMIT_RE.is_match(command) {
            return handle_commit(&repo, &mut record);
        }
    }

    None
}

fn handle_file_modification(repo: &Repository, record: &mut bumper_lanes::session::SessionRecord) -> Option<String> {
    if let Ok(true) = repo.working_tree_matches_head() {
        if let Ok(Some(head_tree)) = repo.head_tree() {
            record.baseline_tree = head_tree;
        }
        record.score = 0;
        record.stop_triggered = false;
        record.updated_at = Utc::now();
        let _ = bumper_lanes::session::save(repo, record);
        return Some("bumper: working tree matches HEAD, baseline reset.".to_string());
    }

    let breakdown = match score::score(repo, &record.baseline_tree) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("post-tool-use: scoring failed, fail open: {e}");
            return None;
        }
    };

    record.score = breakdown.score;
    record.updated_at = Utc::now();
    let _ = bumper_lanes::session::save(repo, record);

    if record.threshold_limit == 0 {
        return None;
    }

    match score::tier(breakdown.score, record.threshold_limit) {
        Tier::Silent => None,
        Tier::Notice => Some(format!(
            "bumper: {}/{} points — wrap up this change soon.",
            breakdown.score, record.threshold_limit
        )),
        Tier::Warning => Some(format!(
            "bumper: {}/{} points — ask the user about a checkpoint before continuing.",
            breakdown.score, record.threshold_limit
        )),
    }
}

fn handle_commit(repo: &Repository, record: &mut bumper_lanes::session::SessionRecord) -> Option<String> {
    let new_baseline = match repo.snapshot() {
        Ok(tree) => tree,
        Err(e) => {
            log::warn!("post-tool-use: snapshot after commit failed, fail open: {e}");
            return None;
        }
    };

    record.baseline_tree = new_baseline;
    record.score = 0;
    record.stop_triggered = false;
    record.updated_at = Utc::now();
    let _ = bumper_lanes::session::save(repo, record);
    Some("bumper: commit detected, baseline reset.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_plain_git_commit() {
        assert!(GIT_COMMIT_RE.is_match("git commit -m \"wip\""));
    }

    #[test]
    fn matches_with_prefix_flags() {
        assert!(GIT_COMMIT_RE.is_match("git -C /repo --work-tree=/repo commit -am x"));
    }

    #[test]
    fn rejects_prose_mentioning_commit() {
        assert!(!GIT_COMMIT_RE.is_match("echo let's commit to this plan"));
    }

    #[test]
    fn rejects_git_log_with_commit_in_grep() {
        assert!(!GIT_COMMIT_RE.is_match("git log --grep=commit"));
    }
}
