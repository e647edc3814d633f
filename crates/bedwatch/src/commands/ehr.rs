//! EHR record command handlers.

use std::fmt::Write;

use chrono::Local;
use tabled::Tabled;

use bedwatch_core::{EhrRecord, EhrRecordCreate, Monitor};

use crate::cli::{EhrArgs, EhrCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct EhrRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Occupied")]
    occupied: i64,
    #[tabled(rename = "Admitted")]
    admissions: i64,
    #[tabled(rename = "Discharged")]
    discharges: i64,
    #[tabled(rename = "ICU")]
    icu: i64,
    #[tabled(rename = "Emergency")]
    emergency: i64,
}

impl From<&EhrRecord> for EhrRow {
    fn from(r: &EhrRecord) -> Self {
        Self {
            id: r.id,
            date: r.date.clone(),
            occupied: r.occupied_beds,
            admissions: r.admissions,
            discharges: r.discharges,
            icu: r.icu_occupied,
            emergency: r.emergency_cases,
        }
    }
}

fn detail(r: &EhrRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:           {}", r.id);
    let _ = writeln!(out, "Hospital:     {}", r.hospital_id);
    let _ = writeln!(out, "Date:         {}", r.date);
    let _ = writeln!(out, "Occupied:     {}", r.occupied_beds);
    let _ = writeln!(out, "Admissions:   {}", r.admissions);
    let _ = writeln!(out, "Discharges:   {}", r.discharges);
    let _ = writeln!(out, "ICU occupied: {}", r.icu_occupied);
    let _ = write!(out, "Emergency:    {}", r.emergency_cases);
    out
}

fn non_negative(field: &str, value: i64) -> Result<i64, CliError> {
    if value < 0 {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "must not be negative".into(),
        });
    }
    Ok(value)
}

pub async fn handle(monitor: &Monitor, args: EhrArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EhrCommand::List { hospital_id } => {
            let mut rx = monitor.notifier().subscribe();
            let mut view = monitor.records_view();
            let records = view.load(hospital_id).await?;
            let out = output::render_list(
                &global.output,
                records,
                |r| EhrRow::from(r),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            util::flush_notifications(&mut rx, global);
            Ok(())
        }

        EhrCommand::Get { id } => {
            let record = monitor.get_ehr_record(id).await?;
            let out = output::render_single(&global.output, &record, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EhrCommand::Create {
            hospital_id,
            date,
            occupied_beds,
            admissions,
            discharges,
            icu_occupied,
            emergency_cases,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let body = EhrRecordCreate {
                hospital_id,
                date: date.format("%Y-%m-%d").to_string(),
                occupied_beds: non_negative("occupied-beds", occupied_beds)?,
                admissions: non_negative("admissions", admissions)?,
                discharges: non_negative("discharges", discharges)?,
                icu_occupied: non_negative("icu-occupied", icu_occupied)?,
                emergency_cases: non_negative("emergency-cases", emergency_cases)?,
            };
            let record = monitor.create_ehr_record(&body).await?;
            util::done(&format!("Record {} added for {}", record.id, record.date), global);
            let out = output::render_single(&global.output, &record, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
