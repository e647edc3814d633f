//! Hospital command handlers.

use std::fmt::Write;

use tabled::Tabled;

use bedwatch_core::{
    Hospital, HospitalForm, HospitalStats, HospitalUpdate, IntegrationConfig, Monitor, SyncResult,
};

use crate::cli::{GlobalOpts, HospitalsArgs, HospitalsCommand};
use crate::error::CliError;
use crate::output;

use super::{dashboard, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct HospitalRow {
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
    #[tabled(rename = "Sync")]
    sync: String,
}

impl From<&Hospital> for HospitalRow {
    fn from(h: &Hospital) -> Self {
        Self {
            id: h.id,
            name: h.hospital_name.clone(),
            location: h.location.clone(),
            beds: h.total_beds,
            icu: h.icu_beds,
            sync: match h.sync_enabled {
                Some(true) => "on".into(),
                Some(false) => "off".into(),
                None => "-".into(),
            },
        }
    }
}

// ── Detail renderers ────────────────────────────────────────────────

fn detail(h: &Hospital) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", h.id);
    let _ = writeln!(out, "Name:        {}", h.hospital_name);
    let _ = writeln!(out, "Location:    {}", h.location);
    let _ = writeln!(out, "Total beds:  {}", h.total_beds);
    let _ = writeln!(out, "ICU beds:    {}", h.icu_beds);
    let _ = writeln!(out, "EHR feed:    {}", util::or_dash(h.api_endpoint.as_deref()));
    let _ = writeln!(out, "Sync:        {}", util::or_dash(h.sync_enabled));
    let _ = write!(out, "Last sync:   {}", util::or_dash(h.last_sync.as_deref()));
    out
}

fn stats_detail(s: &HospitalStats) -> String {
    format!(
        "Hospitals:   {}\nTotal beds:  {}\nICU beds:    {}\nLocations:   {}",
        s.hospitals, s.total_beds, s.icu_beds, s.locations
    )
}

fn sync_detail(r: &SyncResult) -> String {
    let mut out = format!("Status:   {}", r.status);
    if let Some(ref message) = r.message {
        let _ = write!(out, "\nMessage:  {message}");
    }
    if let Some(count) = r.records_synced {
        let _ = write!(out, "\nRecords:  {count}");
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

/// Run the subcommand, then print queued notifications on success. On
/// failure the error report already says what went wrong.
pub async fn handle(
    monitor: &Monitor,
    args: HospitalsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut rx = monitor.notifier().subscribe();
    let result = run(monitor, args.command, global).await;
    if result.is_ok() {
        util::flush_notifications(&mut rx, global);
    }
    result
}

#[allow(clippy::too_many_lines)]
async fn run(
    monitor: &Monitor,
    command: HospitalsCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        HospitalsCommand::List { filter } => {
            let mut view = monitor.hospitals_view();
            let spinner = util::spinner("Loading hospitals...", global);
            let loaded = view.load().await;
            spinner.finish_and_clear();
            loaded?;

            let shown = view.filtered(filter.as_deref().unwrap_or_default());
            let out = output::render_list(
                &global.output,
                &shown,
                |h| HospitalRow::from(*h),
                |h| h.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HospitalsCommand::Get { id } => {
            let hospital = monitor.get_hospital(id).await?;
            let out = output::render_single(&global.output, &hospital, detail, |h| {
                h.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HospitalsCommand::Create {
            name,
            location,
            total_beds,
            icu_beds,
        } => {
            let mut view = monitor.hospitals_view();
            view.open_form();
            *view.form_mut() = HospitalForm {
                name,
                location,
                total_beds,
                icu_beds,
            };
            let created = view.submit().await?;
            let out = output::render_single(&global.output, &created, detail, |h| {
                h.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HospitalsCommand::Update {
            id,
            name,
            location,
            total_beds,
            icu_beds,
        } => {
            let body = HospitalUpdate {
                hospital_name: name,
                location,
                total_beds,
                icu_beds,
            };
            let updated = monitor.update_hospital(id, &body).await?;
            util::done(&format!("Hospital {id} updated"), global);
            let out = output::render_single(&global.output, &updated, detail, |h| {
                h.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HospitalsCommand::View { id } => {
            let mut view = monitor.hospitals_view();
            let snap = view.view_details(id).await?;
            let out = dashboard::render_snapshot(snap, false, global);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HospitalsCommand::Edit { id } => {
            monitor.hospitals_view().edit(id);
            Ok(())
        }

        HospitalsCommand::Delete { id } => {
            monitor.hospitals_view().delete(id);
            Ok(())
        }

        HospitalsCommand::Stats => {
            let mut view = monitor.hospitals_view();
            view.load().await?;
            let stats = view.stats();
            let out = output::render_single(&global.output, &stats, stats_detail, |s| {
                s.hospitals.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HospitalsCommand::Integration {
            id,
            endpoint,
            api_key,
            no_sync,
            interval_minutes,
        } => {
            let body = IntegrationConfig {
                api_endpoint: endpoint,
                api_key,
                sync_enabled: !no_sync,
                sync_interval_minutes: interval_minutes,
            };
            let hospital = monitor.update_integration(id, &body).await?;
            util::done(&format!("EHR feed configured for hospital {id}"), global);
            let out = output::render_single(&global.output, &hospital, detail, |h| {
                h.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HospitalsCommand::Sync { id } => {
            let spinner = util::spinner("Syncing EHR feed...", global);
            let result = monitor.trigger_sync(id).await;
            spinner.finish_and_clear();
            let result = result?;
            let out = output::render_single(&global.output, &result, sync_detail, |r| {
                r.status.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_shows_sync_state() {
        let h = Hospital {
            id: 3,
            hospital_name: "AIIMS Hospital".into(),
            location: "Hyderabad, Telangana".into(),
            total_beds: 150,
            icu_beds: 20,
            api_endpoint: None,
            sync_enabled: Some(false),
            last_sync: None,
        };
        let row = HospitalRow::from(&h);
        assert_eq!(row.sync, "off");
        assert!(detail(&h).contains("EHR feed:    -"));
    }
}
