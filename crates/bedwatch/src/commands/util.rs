//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast;

use bedwatch_core::Notification;
use bedwatch_core::notify::drain;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Whether stderr decorations (color, spinners) are wanted.
pub fn color(global: &GlobalOpts) -> bool {
    output::should_color(&global.color)
}

/// Print everything queued on `rx` to stderr.
pub fn flush_notifications(rx: &mut broadcast::Receiver<Notification>, global: &GlobalOpts) {
    let notes = drain(rx);
    output::print_notifications(&notes, global.quiet, color(global));
}

/// A stderr spinner for slow requests; hidden unless a human is watching a table.
pub fn spinner(message: &str, global: &GlobalOpts) -> ProgressBar {
    let interactive = !global.quiet
        && matches!(global.output, OutputFormat::Table)
        && std::io::stderr().is_terminal();
    if !interactive {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Confirmation line on stderr, silenced by `--quiet`.
pub fn done(message: &str, global: &GlobalOpts) {
    if !global.quiet {
        eprintln!("✓ {message}");
    }
}

/// Render an optional value, `-` when absent.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}
