//! Markdown rendering for CLI help text using termimad.

use termimad::{MadSkin, crossterm::style::Color};

/// Render markdown in help text to ANSI with minimal styling (green headers only)
pub fn render_markdown_in_help(help: &str) -> String {
    let mut skin = MadSkin::no_style();
    skin.headers[0].set_fg(Color::Green);
    skin.headers[1].set_fg(Color::Green);

    let width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);

    let rendered = format!("{}", skin.text(help, Some(width)));

    // Color status symbols to match their descriptions
    colorize_status_symbols(&rendered)
}

/// Add colors to the gauge/tier symbols used in help text (matching the
/// status line's own gauge coloring).
fn colorize_status_symbols(text: &str) -> String {
    use anstyle::{AnsiColor, Color as AnsiStyleColor, Style};

    let success = Style::new().fg_color(Some(AnsiStyleColor::Ansi(AnsiColor::Green)));
    let warning = Style::new().fg_color(Some(AnsiStyleColor::Ansi(AnsiColor::Yellow)));
    let error = Style::new().fg_color(Some(AnsiStyleColor::Ansi(AnsiColor::Red)));
    let hint = Style::new().dimmed();

    text
        .replace("▂ under 70%", &format!("{success}▂{success:#} under 70%"))
        .replace(
            "▄ 70–89%",
            &format!("{warning}▄{warning:#} 70\u{2013}89%"),
        )
        .replace("█ 90%+", &format!("{error}█{error:#} 90%+"))
        .replace("* dirty", &format!("{hint}*{hint:#} dirty"))
}
