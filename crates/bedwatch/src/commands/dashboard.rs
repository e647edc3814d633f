//! Dashboard command: one-shot render of the dashboard view.

use std::fmt::Write;

use serde::Serialize;
use tabled::Tabled;

use bedwatch_core::dashboard::{capacity_available_pct, peak_forecast};
use bedwatch_core::{
    Alert, DashboardBackend, DashboardSnapshot, DashboardView, Monitor, PredictionPoint, ViewState,
};

use crate::cli::{DashboardArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Predicted")]
    predicted: String,
    #[tabled(rename = "Range")]
    range: String,
}

impl From<&PredictionPoint> for PredictionRow {
    fn from(p: &PredictionPoint) -> Self {
        Self {
            date: p.date.clone(),
            predicted: format!("{:.0}", p.predicted_occupancy),
            range: format!("{:.0}-{:.0}", p.lower_bound, p.upper_bound),
        }
    }
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            date: a.date.clone(),
            severity: a.severity.to_string(),
            message: a.message.clone(),
        }
    }
}

// ── Structured report ───────────────────────────────────────────────

#[derive(Serialize)]
struct DashboardReport<'a> {
    #[serde(flatten)]
    snapshot: &'a DashboardSnapshot,
    demo: bool,
    peak_forecast: Option<f64>,
    capacity_available_pct: Option<i64>,
}

// ── Rendering ───────────────────────────────────────────────────────

fn peak_text(predictions: &[PredictionPoint]) -> String {
    peak_forecast(predictions).map_or_else(|| "not available".into(), |v| format!("{v:.0} beds"))
}

/// Multi-section text view of a snapshot.
pub(crate) fn render_snapshot_text(snap: &DashboardSnapshot, demo: bool) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}", snap.hospital_name);
    if !snap.location.is_empty() {
        let _ = write!(out, " · {}", snap.location);
    }
    if demo {
        let _ = write!(out, "  [demo data]");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Status: {}", snap.overall_status);
    let _ = writeln!(out);

    let metrics = vec![
        MetricRow {
            metric: "Total beds",
            value: snap.total_beds.to_string(),
        },
        MetricRow {
            metric: "Occupied",
            value: snap.current_occupied.to_string(),
        },
        MetricRow {
            metric: "ICU beds",
            value: snap.icu_beds.to_string(),
        },
        MetricRow {
            metric: "ICU occupied",
            value: snap.current_icu_occupied.to_string(),
        },
        MetricRow {
            metric: "Utilization",
            value: format!("{:.1}%", snap.current_utilization),
        },
        MetricRow {
            metric: "Peak forecast",
            value: peak_text(&snap.predictions),
        },
        MetricRow {
            metric: "Capacity available",
            value: util::or_dash(
                capacity_available_pct(snap.total_beds, snap.current_occupied)
                    .map(|pct| format!("{pct}%")),
            ),
        },
    ];
    let _ = writeln!(out, "{}", output::render_table(&metrics));

    if !snap.predictions.is_empty() {
        let rows: Vec<PredictionRow> = snap.predictions.iter().map(PredictionRow::from).collect();
        let _ = writeln!(out, "\nForecast");
        let _ = writeln!(out, "{}", output::render_table(&rows));
    }

    if snap.alerts.is_empty() {
        let _ = write!(out, "\nNo active alerts");
    } else {
        let rows: Vec<AlertRow> = snap.alerts.iter().map(AlertRow::from).collect();
        let _ = writeln!(out, "\nAlerts");
        let _ = write!(out, "{}", output::render_table(&rows));
    }

    out
}

/// Render a snapshot in the selected output format.
pub(crate) fn render_snapshot(snap: &DashboardSnapshot, demo: bool, global: &GlobalOpts) -> String {
    let report = DashboardReport {
        snapshot: snap,
        demo,
        peak_forecast: peak_forecast(&snap.predictions),
        capacity_available_pct: capacity_available_pct(snap.total_beds, snap.current_occupied),
    };
    output::render_single(
        &global.output,
        &report,
        |r| render_snapshot_text(r.snapshot, r.demo),
        |r| r.snapshot.hospital_id.to_string(),
    )
}

/// Select `hospital_id` (or let mount pick the first hospital) and load.
pub(crate) async fn mount_view<B: DashboardBackend>(
    view: &mut DashboardView<B>,
    hospital_id: Option<i64>,
) {
    // Selecting first makes mount skip its auto-selection.
    if let Some(id) = hospital_id {
        view.select(id).await;
    }
    view.mount().await;
}

/// Turn the settled view into output, or the error it ended in.
pub(crate) fn render_view<B: DashboardBackend>(
    view: &DashboardView<B>,
    global: &GlobalOpts,
) -> Result<Option<String>, CliError> {
    if let ViewState::Error(reason) = view.state() {
        return Err(CliError::ApiError {
            message: reason.clone(),
        });
    }
    Ok(view
        .snapshot()
        .map(|snap| render_snapshot(snap, view.snapshot_is_demo(), global)))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &Monitor,
    args: DashboardArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut rx = monitor.notifier().subscribe();
    let mut view = monitor.dashboard_view();

    let spinner = util::spinner("Loading dashboard...", global);
    mount_view(&mut view, args.hospital_id).await;
    spinner.finish_and_clear();

    util::flush_notifications(&mut rx, global);

    match render_view(&view, global)? {
        Some(out) => output::print_output(&out, global.quiet),
        None => {
            if !global.quiet {
                eprintln!("No hospitals yet. Add one with: bedwatch hospitals create");
            }
        }
    }
    Ok(())
}
