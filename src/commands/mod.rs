//! The six hook handlers (C5–C10), one module per host event, plus the
//! shared auto-reset helpers they all lean on.

pub mod post_tool_use;
pub mod pre_tool_use;
pub mod prompt_submit;
pub mod session_start;
pub mod status_line;
pub mod stop;

use chrono::Utc;

use bumper_lanes::config::ResolvedConfig;
use bumper_lanes::git::Repository;
use bumper_lanes::session::SessionRecord;

/// Resolve the session record for `session_id`, failing open to `None` for
/// every error category the record lookup can hit (spec §7: EnvironmentMissing,
/// StateMissing, StateCorrupt all fail open the same way for gate handlers).
pub(crate) fn load_session_or_none(repo: &Repository, session_id: &str) -> Option<SessionRecord> {
    if !repo.is_git_repo() {
        return None;
    }
    bumper_lanes::session::load(repo, session_id)
        .ok()
        .flatten()
}

/// Apply the auto-reset branch shared by the Pre-Edit Gate and Post-Tool
/// Monitor: when the working tree exactly matches `HEAD^{tree}`, the user
/// has externally committed or reverted, so the gate re-baselines instead
/// of staying tripped.
pub(crate) fn apply_auto_reset(repo: &Repository, record: &mut SessionRecord) -> bool {
    match repo.working_tree_matches_head() {
        Ok(true) => {
            if let Ok(Some(head_tree)) = repo.head_tree() {
                record.baseline_tree = head_tree;
            }
            record.baseline_branch = repo.current_branch().unwrap_or_default();
            record.score = 0;
            record.stop_triggered = false;
            record.updated_at = Utc::now();
            true
        }
        _ => false,
    }
}

pub(crate) fn resolved_config_defaults(repo: &Repository) -> ResolvedConfig {
    bumper_lanes::config::resolve(repo)
}
