//! Status Renderer (C10): one cached-score summary line plus a live
//! detail block rendered by the external visualizer.

use bumper_lanes::display;
use bumper_lanes::git::Repository;
use bumper_lanes::hook_io::HookRequest;
use bumper_lanes::styling::GaugeTier;
use bumper_lanes::visualizer;

/// Which part of the status line a caller wants (spec §4.10's widget modes),
/// letting an external status-line composer embed just one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetMode {
    All,
    Indicator,
    DiffTree,
}

impl WidgetMode {
    pub fn parse(s: &str) -> Self {
        match s {
            "indicator" => WidgetMode::Indicator,
            "diff-tree" => WidgetMode::DiffTree,
            _ => WidgetMode::All,
        }
    }
}

/// Non-breaking space the detail block uses in place of a plain space, so
/// the host's whitespace-collapsing doesn't eat indentation.
const NBSP: char = '\u{00A0}';

pub fn run(request: &HookRequest, widget: WidgetMode) -> String {
    let repo = Repository::at(&request.workspace.current_dir);

    let Some(record) = super::load_session_or_none(&repo, &request.session_id) else {
        return minimal_line(request);
    };

    let mut out = String::new();

    if matches!(widget, WidgetMode::All | WidgetMode::Indicator) {
        out.push_str(&indicator_line(request, &repo, &record));
    }

    if matches!(widget, WidgetMode::All | WidgetMode::DiffTree) && record.show_diff_viz {
        if let Some(detail) = visualizer::render(repo.root(), &record.view_mode, &record.view_opts)
        {
            for line in detail.lines() {
                out.push('\n');
                out.push_str("\x1b[0m");
                out.push_str(&line.replace(' ', &NBSP.to_string()));
            }
        }
    }

    out
}

fn indicator_line(
    request: &HookRequest,
    repo: &Repository,
    record: &bumper_lanes::session::SessionRecord,
) -> String {
    let model = if request.model.display_name.is_empty() {
        "bumper"
    } else {
        &request.model.display_name
    };
    let dir = shorten_dir(&request.workspace.current_dir);
    let branch = repo.current_branch().unwrap_or_default();
    let dirty = repo.is_dirty().unwrap_or(false);
    let dirty_marker = if dirty { "*" } else { "" };
    let cost = request.cost.total_cost_usd;
    let gauge =
        GaugeTier::from_ratio(record.score, record.threshold_limit, record.stop_triggered).render();

    format!(
        "[{model}] | {dir} | {branch}{dirty_marker} | ${cost:.2} | {gauge} [{}]",
        record.view_mode
    )
}

fn shorten_dir(cwd: &str) -> String {
    let path = std::path::Path::new(cwd);
    match std::env::var("HOME") {
        Ok(home) => display::shorten_path(path, std::path::Path::new(&home)),
        Err(_) => path.display().to_string(),
    }
}

fn minimal_line(request: &HookRequest) -> String {
    let model = if request.model.display_name.is_empty() {
        "bumper"
    } else {
        &request.model.display_name
    };
    format!("[{model}]")
}
