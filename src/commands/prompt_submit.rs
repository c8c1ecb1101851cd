//! Prompt Interceptor (C9): reserved slash-commands, executed directly and
//! never dispatched to the LLM. `decision:"block"` here means "handled",
//! the inverse sense from the Stop event's "block".

use std::sync::LazyLock;

use chrono::Utc;

use bumper_lanes::config;
use bumper_lanes::git::Repository;
use bumper_lanes::hook_io::{self, HookRequest};
use bumper_lanes::session::SessionRecord;
use bumper_lanes::visualizer;

/// Anchored at string start, optional namespace prefix, a `bumper-<name>`
/// command, optional whitespace-separated argument, optional trailing
/// whitespace. No substring matches (spec §4.9, testable property 11).
static COMMAND_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^/(?:[A-Za-z0-9_-]+:)?bumper-([a-z-]+)(?:\s+(\S.*?))?\s*$")
        .expect("static regex is valid")
});

pub fn run(request: &HookRequest) -> Option<serde_json::Value> {
    let caps = COMMAND_RE.captures(request.prompt.trim_end())?;
    let name = caps.get(1)?.as_str();
    let arg = caps.get(2).map(|m| m.as_str().trim());

    let repo = Repository::at(&request.cwd);
    let Some(mut record) = super::load_session_or_none(&repo, &request.session_id) else {
        // Fail open per testable property 12: no record, no handling at all
        // (the prompt falls through to the LLM rather than erroring).
        return None;
    };

    let reason = match name {
        "reset" => handle_reset(&repo, &mut record),
        "pause" => handle_pause(&repo, &mut record),
        "resume" => handle_resume(&repo, &mut record),
        "view" => match arg {
            Some(mode) => handle_view(&repo, &mut record, mode),
            None => return None, // "/bumper-view" with no mode: not a recognized command
        },
        "config" => match arg {
            Some(value) => handle_config_set(&repo, &mut record, value),
            None => handle_config_show(&record),
        },
        other => {
            // `bumper-<mode-name>` no-arg form: same effect as `bumper-view <mode>`
            // but triggers the host's immediate status-line refresh quirk.
            if arg.is_none() && visualizer::is_valid_mode(other) {
                handle_view(&repo, &mut record, other)
            } else {
                return None;
            }
        }
    };

    Some(hook_io::prompt_handled(&reason))
}

fn handle_reset(repo: &Repository, record: &mut SessionRecord) -> String {
    match repo.snapshot() {
        Ok(tree) => {
            record.baseline_tree = tree;
            record.score = 0;
            record.stop_triggered = false;
            record.updated_at = Utc::now();
            let _ = bumper_lanes::session::save(repo, record);
            "bumper: baseline reset, score cleared.".to_string()
        }
        Err(e) => format!("bumper: could not reset baseline: {e}"),
    }
}

fn handle_pause(repo: &Repository, record: &mut SessionRecord) -> String {
    record.paused = true;
    record.updated_at = Utc::now();
    let _ = bumper_lanes::session::save(repo, record);
    "bumper: enforcement paused.".to_string()
}

fn handle_resume(repo: &Repository, record: &mut SessionRecord) -> String {
    record.paused = false;
    record.updated_at = Utc::now();
    let _ = bumper_lanes::session::save(repo, record);
    "bumper: enforcement resumed.".to_string()
}

fn handle_view(repo: &Repository, record: &mut SessionRecord, mode: &str) -> String {
    if !visualizer::is_valid_mode(mode) {
        return format!("bumper: \"{mode}\" is not a known view mode.");
    }
    if let Err(e) = config::set_private_view_mode(repo, mode) {
        return format!("bumper: could not persist view mode: {e}");
    }
    record.view_mode = mode.to_string();
    record.updated_at = Utc::now();
    let _ = bumper_lanes::session::save(repo, record);
    format!("bumper: view mode set to \"{mode}\".")
}

fn handle_config_show(record: &SessionRecord) -> String {
    format!(
        "bumper: threshold={} view_mode={} show_diff_viz={}",
        record.threshold_limit, record.view_mode, record.show_diff_viz
    )
}

fn handle_config_set(repo: &Repository, record: &mut SessionRecord, value: &str) -> String {
    let Ok(threshold) = value.parse::<u32>() else {
        return format!("bumper: \"{value}\" is not a valid threshold.");
    };
    if !config::is_valid_threshold(threshold) {
        return "bumper: threshold must be 0 or in the range 50..=2000.".to_string();
    }
    if let Err(e) = config::set_tracked_threshold(repo, threshold) {
        return format!("bumper: could not persist threshold: {e}");
    }
    record.threshold_limit = threshold;
    record.updated_at = Utc::now();
    let _ = bumper_lanes::session::save(repo, record);
    format!("bumper: threshold set to {threshold}.")
}
