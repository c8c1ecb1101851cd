//! Stop Gate (C8): the end-of-turn decision machine. "Soft" enforcement —
//! it only blocks the *stop event*, never tool calls; the Pre-Edit Gate is
//! the hard enforcement layer.

use chrono::Utc;

use bumper_lanes::git::Repository;
use bumper_lanes::hook_io::{self, HookRequest};
use bumper_lanes::score;
use bumper_lanes::session::StopLock;

use super::load_session_or_none;

pub fn run(request: &HookRequest) -> Option<serde_json::Value> {
    // Re-entrancy: the host tells us the Stop hook already ran this turn.
    if request.stop_hook_active {
        return None;
    }

    let repo = Repository::at(&request.cwd);
    if !repo.is_git_repo() {
        return None;
    }

    let lock = match StopLock::try_acquire(&repo, &request.session_id) {
        Ok(Some(lock)) => lock,
        Ok(None) => return None, // fail open: another Stop invocation holds it
        Err(e) => {
            log::warn!("stop: could not acquire lock, fail open: {e}");
            return None;
        }
    };
    let result = run_locked(&repo, request);
    drop(lock);
    result
}

fn run_locked(repo: &Repository, request: &HookRequest) -> Option<serde_json::Value> {
    let Some(mut record) = load_session_or_none(repo, &request.session_id) else {
        return None;
    };

    if record.paused {
        if let Ok(breakdown) = score::score(repo, &record.baseline_tree) {
            record.score = breakdown.score;
            record.updated_at = Utc::now();
            let _ = bumper_lanes::session::save(repo, &record);
        }
        return None;
    }

    let current_branch = repo.current_branch().unwrap_or_default();
    if !record.baseline_branch.is_empty() && current_branch != record.baseline_branch {
        if let Ok(current_tree) = repo.snapshot() {
            record.baseline_tree = current_tree;
        }
        record.baseline_branch = current_branch;
        record.score = 0;
        record.stop_triggered = false;
        record.updated_at = Utc::now();
        let _ = bumper_lanes::session::save(repo, &record);
        return hook_io::stop_allow(Some("bumper: branch changed, baseline reset."));
    }

    if record.stop_triggered {
        return None;
    }

    let breakdown = match score::score(repo, &record.baseline_tree) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("stop: scoring failed, fail open: {e}");
            return None;
        }
    };

    if record.threshold_limit == 0 || breakdown.score <= record.threshold_limit {
        record.score = breakdown.score;
        record.updated_at = Utc::now();
        let _ = bumper_lanes::session::save(repo, &record);
        return None;
    }

    record.stop_triggered = true;
    record.score = breakdown.score;
    record.updated_at = Utc::now();
    let _ = bumper_lanes::session::save(repo, &record);

    let percent = breakdown.score as u64 * 100 / record.threshold_limit as u64;
    let reason = format!(
        "bumper: {}/{} ({percent}%) — N={} E={} F={} scatter={}. Review the changes, then run /bumper-reset.",
        breakdown.score,
        record.threshold_limit,
        breakdown.new_additions,
        breakdown.edit_additions,
        breakdown.files_touched,
        breakdown.scatter_penalty,
    );
    Some(hook_io::stop_block(&reason, None))
}
