//! Session-Start Handler (C5): establish the baseline and an empty session
//! record. Every failure here fails open — the host still gets its exit 0,
//! no body, and a later handler finding no record fails open in turn.

use chrono::Utc;

use bumper_lanes::git::Repository;
use bumper_lanes::hook_io::HookRequest;
use bumper_lanes::session::SessionRecord;

use super::resolved_config_defaults;

pub fn run(request: &HookRequest) {
    let repo = Repository::at(&request.cwd);

    if !repo.is_git_repo() {
        log::warn!("session-start: {} is not a git repository", request.cwd);
        return;
    }

    let baseline_tree = match repo.snapshot() {
        Ok(tree) => tree,
        Err(e) => {
            log::warn!("session-start: snapshot failed, fail open: {e}");
            return;
        }
    };

    let baseline_branch = repo.current_branch().unwrap_or_default();
    let config = resolved_config_defaults(&repo);

    let record = SessionRecord::new(
        request.session_id.clone(),
        baseline_tree,
        baseline_branch,
        config.threshold,
        config.default_view_mode,
        config.default_view_opts,
        config.show_diff_viz,
        Utc::now(),
    );

    if let Err(e) = bumper_lanes::session::save(&repo, &record) {
        log::warn!("session-start: could not persist session record: {e}");
    }
}
