//! Terminal styling: color constants and `println!`/`eprintln!` wrappers that
//! route through `color-print`'s `<tag>` syntax, matching the teacher's
//! semantic mapping (errors red, warnings yellow, hints dim, success green).

pub mod constants;

pub use constants::*;

use anstyle::{AnsiColor, Color, Style};

/// Hint text style (dim).
pub const HINT: Style = Style::new().dimmed();

/// Warning text style (yellow).
pub const WARNING: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));

/// Error text style (red, bold).
pub const ERROR: Style = Style::new()
    .fg_color(Some(Color::Ansi(AnsiColor::Red)))
    .bold();

/// Success text style (green).
pub const SUCCESS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));

/// The Stop/Pre-Edit gauge's three reveal tiers (spec §4.10), each a block
/// character of increasing height plus its semantic color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeTier {
    Under70,
    Between70And90,
    AtOrOver90,
}

impl GaugeTier {
    /// `stop_triggered` forces the top tier regardless of the score/limit
    /// ratio (spec §4.10: "revealed at <70% / 70–89% / ≥90% **or tripped**").
    /// A latched session stays red even after `/bumper-config` raises the
    /// limit enough to drop the ratio, since only the Pre-Edit Gate's
    /// auto-reset/auto-recovery branches or an explicit reset/resume clear
    /// the latch.
    pub fn from_ratio(score: u32, threshold_limit: u32, stop_triggered: bool) -> Self {
        if stop_triggered {
            return GaugeTier::AtOrOver90;
        }
        if threshold_limit == 0 {
            return GaugeTier::Under70;
        }
        if score as u64 * 100 >= 90 * threshold_limit as u64 {
            GaugeTier::AtOrOver90
        } else if score as u64 * 100 >= 70 * threshold_limit as u64 {
            GaugeTier::Between70And90
        } else {
            GaugeTier::Under70
        }
    }

    fn block(self) -> char {
        match self {
            GaugeTier::Under70 => '\u{2582}',         // ▂
            GaugeTier::Between70And90 => '\u{2584}',  // ▄
            GaugeTier::AtOrOver90 => '\u{2588}',      // █
        }
    }

    fn style(self) -> Style {
        match self {
            GaugeTier::Under70 => SUCCESS,
            GaugeTier::Between70And90 => WARNING,
            GaugeTier::AtOrOver90 => ERROR,
        }
    }

    /// The colored single-character gauge glyph for the status line.
    pub fn render(self) -> String {
        format!("{}{}{}", self.style().render(), self.block(), self.style().render_reset())
    }
}

/// Print a `color-print`-tagged line to stdout, matching the teacher's
/// `styling::println!` helper so call sites read like ordinary `println!`.
#[macro_export]
macro_rules! styled_println {
    ($($arg:tt)*) => {
        println!("{}", ::color_print::cformat!($($arg)*))
    };
}

/// Print a `color-print`-tagged line to stderr.
#[macro_export]
macro_rules! styled_eprintln {
    ($($arg:tt)*) => {
        eprintln!("{}", ::color_print::cformat!($($arg)*))
    };
}
