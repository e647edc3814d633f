//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Notifications go to stderr so piped stdout stays machine-readable.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use bedwatch_core::{Notification, NotificationLevel};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Paint `text` in the color that goes with `level`.
pub fn paint_level(level: NotificationLevel, text: &str, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match level {
        NotificationLevel::Info => text.cyan().to_string(),
        NotificationLevel::Success => text.green().to_string(),
        NotificationLevel::Warning => text.yellow().to_string(),
        NotificationLevel::Error => text.red().to_string(),
        NotificationLevel::Critical => text.red().bold().to_string(),
    }
}

fn level_marker(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Info => "i",
        NotificationLevel::Success => "✓",
        NotificationLevel::Warning => "!",
        NotificationLevel::Error => "✗",
        NotificationLevel::Critical => "‼",
    }
}

/// One notification as a single stderr line.
pub fn format_notification(n: &Notification, color: bool) -> String {
    let head = format!("{} {}", level_marker(n.level), n.level);
    format!("{} {}", paint_level(n.level, &head, color), n.message)
}

/// Print notifications to stderr. Errors always show; the rest respect quiet.
pub fn print_notifications(notes: &[Notification], quiet: bool, color: bool) {
    let mut stderr = io::stderr().lock();
    for n in notes {
        let fatal = matches!(
            n.level,
            NotificationLevel::Error | NotificationLevel::Critical
        );
        if quiet && !fatal {
            continue;
        }
        let _ = writeln!(stderr, "{}", format_notification(n, color));
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, Tabled)]
    struct Row {
        id: i64,
        name: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                name: "Apollo Hospitals".into(),
            },
            Row {
                id: 2,
                name: "Fortis Healthcare".into(),
            },
        ]
    }

    fn identity(r: &Row) -> Row {
        Row {
            id: r.id,
            name: r.name.clone(),
        }
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &rows(), identity, |r| r.id.to_string());
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(&OutputFormat::JsonCompact, &rows(), identity, |r| {
            r.id.to_string()
        });
        assert!(!out.contains('\n'));
        assert!(out.contains("\"Fortis Healthcare\""));
    }

    #[test]
    fn table_contains_headers_and_values() {
        let out = render_list(&OutputFormat::Table, &rows(), identity, |r| r.id.to_string());
        assert!(out.contains("name"));
        assert!(out.contains("Apollo Hospitals"));
    }

    #[test]
    fn uncolored_notification_is_plain_text() {
        let line = format_notification(&Notification::warning("Using demo data"), false);
        assert_eq!(line, "! warning Using demo data");
    }
}
