//! Style constants for terminal output
//!
//! # Styling with color-print
//!
//! Use `cformat!` with HTML-like tags for all user-facing messages:
//!
//! ```rust,ignore
//! use color_print::cformat;
//!
//! // Simple styling
//! cformat!("<green>Success message</>")
//!
//! // Nested styles - bold inherits green
//! cformat!("<green>Removed branch <bold>{branch}</> successfully</>")
//!
//! // Semantic mapping:
//! // - Errors: <red>...</>
//! // - Warnings: <yellow>...</>
//! // - Hints: <dim>...</>
//! // - Success: <green>...</>
//! ```
//!
//! # anstyle constants
//!
//! A few `Style` constants remain for programmatic use where a computed
//! style is needed at runtime rather than a literal `cformat!` tag (the
//! status line's gauge glyph, see `super::GaugeTier`).

use anstyle::{AnsiColor, Color, Style};

/// Addition style for per-file added-line counts (`bumper score`'s diagnostic
/// breakdown).
pub const ADDITION: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
