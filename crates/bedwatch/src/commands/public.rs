//! Patient-facing public endpoints. No session required.

use std::fmt::Write;

use tabled::Tabled;

use bedwatch_core::{
    AlertsResponse, CityRecommendation, DayForecast, HospitalAvailability, HospitalComparison,
    HospitalForecast, Monitor, PublicHospitalInfo,
};

use crate::cli::{GlobalOpts, PublicArgs, PublicCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct HospitalInfoRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Beds")]
    beds: i64,
    #[tabled(rename = "ICU")]
    icu: i64,
}

impl From<&PublicHospitalInfo> for HospitalInfoRow {
    fn from(h: &PublicHospitalInfo) -> Self {
        Self {
            id: h.id,
            name: h.hospital_name.clone(),
            location: h.location.clone(),
            beds: h.total_beds,
            icu: h.icu_beds,
        }
    }
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Occupied")]
    occupied: i64,
    #[tabled(rename = "Available")]
    available: i64,
    #[tabled(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "Risk")]
    risk: String,
}

impl From<&DayForecast> for DayRow {
    fn from(d: &DayForecast) -> Self {
        Self {
            date: d.date.clone(),
            occupied: d.predicted_occupancy,
            available: d.predicted_available,
            utilization: format!("{:.1}%", d.utilization_percentage),
            risk: d.risk_level.to_string(),
        }
    }
}

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Available")]
    available: i64,
    #[tabled(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "7-day avg")]
    avg_predicted: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Risk")]
    risk: String,
}

impl From<&HospitalComparison> for ComparisonRow {
    fn from(c: &HospitalComparison) -> Self {
        Self {
            id: c.hospital_id,
            name: c.hospital_name.clone(),
            location: c.location.clone(),
            available: c.current_available,
            utilization: format!("{:.1}%", c.utilization_percentage),
            avg_predicted: format!("{:.1}", c.avg_predicted_occupancy_7_days),
            score: format!("{:.1}", c.recommendation_score),
            risk: c.risk_level.to_string(),
        }
    }
}

// ── Detail renderers ────────────────────────────────────────────────

fn availability_detail(a: &HospitalAvailability) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} · {}", a.hospital_name, a.location);
    let _ = writeln!(out, "Status:       {}", a.status);
    let _ = writeln!(out, "Available:    {} of {}", a.current_available, a.total_beds);
    let _ = write!(out, "Utilization:  {:.1}%", a.utilization_percentage);
    if let Some(ref updated) = a.last_updated {
        let _ = write!(out, "\nUpdated:      {updated}");
    }
    out
}

fn forecast_detail(f: &HospitalForecast) -> String {
    let mut out = format!("{} · {}\n", f.hospital_name, f.location);
    if let Some(ref day) = f.best_day_to_visit {
        let _ = write!(out, "Best day to visit: {day}");
        if let Some(occ) = f.best_day_occupancy {
            let _ = write!(out, " ({occ} beds expected occupied)");
        }
        let _ = writeln!(out);
    }
    let rows: Vec<DayRow> = f.forecast.iter().map(DayRow::from).collect();
    let _ = write!(out, "{}", output::render_table(&rows));
    out
}

fn recommendation_detail(r: &CityRecommendation) -> String {
    let mut out = format!(
        "Best in {}: {} (ID {})\n{}\n",
        r.city, r.best_hospital_name, r.best_hospital_id, r.reason
    );
    if !r.recommended_hospitals.is_empty() {
        let rows: Vec<ComparisonRow> = r
            .recommended_hospitals
            .iter()
            .map(ComparisonRow::from)
            .collect();
        let _ = write!(out, "{}", output::render_table(&rows));
    }
    out
}

fn alerts_detail(a: &AlertsResponse) -> String {
    let mut out = format!("{}\n", a.hospital_name);
    if a.alerts.is_empty() {
        let _ = writeln!(out, "No capacity alerts");
    }
    for alert in &a.alerts {
        let _ = writeln!(
            out,
            "[{}] {} {}: {}",
            alert.severity, alert.date, alert.alert_type, alert.message
        );
    }
    if !a.alternate_hospitals.is_empty() {
        let rows: Vec<HospitalInfoRow> = a
            .alternate_hospitals
            .iter()
            .map(HospitalInfoRow::from)
            .collect();
        let _ = writeln!(out, "\nAlternatives");
        let _ = write!(out, "{}", output::render_table(&rows));
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &Monitor,
    args: PublicArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        PublicCommand::Hospitals { city } => {
            let list = monitor.public_hospitals(city.as_deref()).await?;
            output::render_list(&global.output, &list, |h| HospitalInfoRow::from(h), |h| {
                h.id.to_string()
            })
        }

        PublicCommand::Availability { id } => {
            let a = monitor.public_availability(id).await?;
            output::render_single(&global.output, &a, availability_detail, |a| {
                a.current_available.to_string()
            })
        }

        PublicCommand::Forecast { id, days } => {
            if !(1..=14).contains(&days) {
                return Err(CliError::Validation {
                    field: "days".into(),
                    reason: "must be between 1 and 14".into(),
                });
            }
            let f = monitor.public_forecast(id, days).await?;
            output::render_single(&global.output, &f, forecast_detail, |f| {
                f.best_day_to_visit.clone().unwrap_or_default()
            })
        }

        PublicCommand::Compare { city } => {
            let ranked = monitor.public_compare(city.as_deref()).await?;
            output::render_list(&global.output, &ranked, |c| ComparisonRow::from(c), |c| {
                c.hospital_id.to_string()
            })
        }

        PublicCommand::Recommend { city } => {
            let rec = monitor.public_recommendation(&city).await?;
            output::render_single(&global.output, &rec, recommendation_detail, |r| {
                r.best_hospital_id.to_string()
            })
        }

        PublicCommand::Alerts { id } => {
            let alerts = monitor.public_alerts(id).await?;
            output::render_single(&global.output, &alerts, alerts_detail, |a| {
                a.alerts
                    .iter()
                    .map(|al| al.message.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
