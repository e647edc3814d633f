//! Predict command: raw forecast for one hospital.

use std::fmt::Write;

use tabled::Tabled;

use bedwatch_core::dashboard::peak_forecast;
use bedwatch_core::{Monitor, PredictionPoint, PredictionResponse};

use crate::cli::{GlobalOpts, PredictArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Predicted")]
    predicted: String,
    #[tabled(rename = "Lower")]
    lower: String,
    #[tabled(rename = "Upper")]
    upper: String,
}

impl From<&PredictionPoint> for ForecastRow {
    fn from(p: &PredictionPoint) -> Self {
        Self {
            date: p.date.clone(),
            predicted: format!("{:.1}", p.predicted_occupancy),
            lower: format!("{:.1}", p.lower_bound),
            upper: format!("{:.1}", p.upper_bound),
        }
    }
}

fn detail(resp: &PredictionResponse) -> String {
    let mut out = format!(
        "{} ({} beds)\nPeak forecast: {}\n",
        resp.hospital_name,
        resp.total_beds,
        peak_forecast(&resp.predictions)
            .map_or_else(|| "not available".into(), |v| format!("{v:.0} beds")),
    );
    let rows: Vec<ForecastRow> = resp.predictions.iter().map(ForecastRow::from).collect();
    let _ = write!(out, "{}", output::render_table(&rows));
    out
}

pub async fn handle(
    monitor: &Monitor,
    args: PredictArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.days == 0 {
        return Err(CliError::Validation {
            field: "days".into(),
            reason: "must be at least 1".into(),
        });
    }

    let spinner = util::spinner("Forecasting...", global);
    let result = monitor.predictions(args.id, args.days).await;
    spinner.finish_and_clear();
    let resp = result?;

    let out = output::render_single(&global.output, &resp, detail, |r| {
        r.predictions
            .iter()
            .map(|p| format!("{}\t{:.1}", p.date, p.predicted_occupancy))
            .collect::<Vec<_>>()
            .join("\n")
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
