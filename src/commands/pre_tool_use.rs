//! Pre-Edit Gate (C6): the decision table that allows or denies a
//! file-modifying tool call before the host executes it.

use chrono::Utc;

use bumper_lanes::git::Repository;
use bumper_lanes::hook_io::{self, HookRequest};
use bumper_lanes::score;

use super::{apply_auto_reset, load_session_or_none};

/// Tool names the host may route to a file-modifying tool call. Anything
/// outside this set is always allowed by the first row of the table.
const FILE_MODIFICATION_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];

pub fn run(request: &HookRequest) -> Option<serde_json::Value> {
    if !FILE_MODIFICATION_TOOLS.contains(&request.tool_name.as_str()) {
        return None;
    }

    let repo = Repository::at(&request.cwd);
    let Some(mut record) = load_session_or_none(&repo, &request.session_id) else {
        return None;
    };

    if record.paused {
        return None;
    }
    if record.threshold_limit == 0 {
        return None;
    }
    if !record.stop_triggered {
        return None;
    }

    // Auto-reset branch: the working tree already matches HEAD^{tree}.
    if apply_auto_reset(&repo, &mut record) {
        let _ = bumper_lanes::session::save(&repo, &record);
        return None;
    }

    // Auto-recovery branch: recompute fresh against the existing baseline.
    let breakdown = match score::score(&repo, &record.baseline_tree) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("pre-tool-use: scoring failed, fail open: {e}");
            return None;
        }
    };

    if breakdown.score <= record.threshold_limit {
        record.score = breakdown.score;
        record.stop_triggered = false;
        record.updated_at = Utc::now();
        let _ = bumper_lanes::session::save(&repo, &record);
        return None;
    }

    record.score = breakdown.score;
    record.updated_at = Utc::now();
    let _ = bumper_lanes::session::save(&repo, &record);

    let percent = if record.threshold_limit == 0 {
        0
    } else {
        breakdown.score as u64 * 100 / record.threshold_limit as u64
    };
    let reason = format!(
        "bumper: {}/{} points ({percent}%) unreviewed. Ask the user to review and run /bumper-reset before further edits.",
        breakdown.score, record.threshold_limit
    );

    Some(hook_io::pre_tool_use_deny(&reason))
}
