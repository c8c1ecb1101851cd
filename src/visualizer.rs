//! The external visualizer contract (spec §6): an independent binary that
//! renders a diff against `HEAD` given a mode name and an opaque options
//! string. The engine never interprets the rendering, only whether it is
//! present.

use std::process::Command;

const VISUALIZER_BIN_ENV: &str = "BUMPER_VISUALIZER";
const DEFAULT_VISUALIZER_BIN: &str = "bumper-diff-viz";

fn visualizer_bin() -> String {
    std::env::var(VISUALIZER_BIN_ENV).unwrap_or_else(|_| DEFAULT_VISUALIZER_BIN.to_string())
}

/// Ask the visualizer for its legal mode names (`--list-modes`). Used to
/// validate `bumper-view <mode>` before persisting a new `view_mode`.
pub fn list_modes() -> Option<Vec<String>> {
    let output = Command::new(visualizer_bin())
        .arg("--list-modes")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    Some(
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Render the diff against `HEAD` in `mode` with `opts`. Empty or literal
/// `"No changes"` output is treated as "nothing to show" and returns `None`
/// — the Status Renderer then emits no detail block lines.
pub fn render(working_dir: &std::path::Path, mode: &str, opts: &str) -> Option<String> {
    let mut cmd = Command::new(visualizer_bin());
    cmd.current_dir(working_dir).arg("--mode").arg(mode);
    if !opts.is_empty() {
        if let Some(parsed) = shlex::split(opts) {
            cmd.args(parsed);
        }
    }

    let output = cmd.output().ok()?;
    if !output.status.success() {
        log::warn!(
            "visualizer exited with {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
        return None;
    }

    let text = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
    if text.is_empty() || text == "No changes" {
        None
    } else {
        Some(text)
    }
}

/// Whether `mode` is one of the visualizer's advertised modes, per the
/// `bumper-view <mode>` validation rule. Fails open to `true` when the
/// visualizer cannot be reached — an unreachable visualizer is a rendering
/// degradation, not a reason to reject a user's config command.
pub fn is_valid_mode(mode: &str) -> bool {
    match list_modes() {
        Some(modes) => modes.iter().any(|m| m == mode),
        None => true,
    }
}
