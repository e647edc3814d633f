//! Watch command: dashboard view fed by the live-update poller.

use chrono::Local;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use bedwatch_core::{DashboardSnapshot, Monitor};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{dashboard, util};

pub async fn handle(monitor: &Monitor, args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut notes = monitor.notifier().subscribe();
    let mut view = monitor.dashboard_view();

    dashboard::mount_view(&mut view, args.hospital_id).await;
    util::flush_notifications(&mut notes, global);
    if let Some(out) = dashboard::render_view(&view, global)? {
        output::print_output(&out, global.quiet);
    }

    let (tx, mut updates) = mpsc::unbounded_channel::<DashboardSnapshot>();
    let on_update = move |snap: DashboardSnapshot| {
        let _ = tx.send(snap);
    };
    let live = match args.interval {
        Some(period) => monitor.live_updates_every(view.selected(), period, on_update),
        None => monitor.live_updates(view.selected(), on_update),
    };
    let Some(live) = live else {
        if !global.quiet {
            eprintln!("No hospital to watch. Add one with: bedwatch hospitals create");
        }
        return Ok(());
    };

    if !global.quiet {
        eprintln!("Watching hospital {} (Ctrl-C to stop)", live.target());
    }

    let color = util::color(global);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res?;
                break;
            }
            Some(snap) = updates.recv() => {
                view.apply_snapshot(snap);
                if let Some(out) = dashboard::render_view(&view, global)? {
                    if matches!(global.output, OutputFormat::Table) && !global.quiet {
                        println!("\n── {} ──", Local::now().format("%H:%M:%S"));
                    }
                    output::print_output(&out, global.quiet);
                }
            }
            note = notes.recv() => match note {
                Ok(n) => output::print_notifications(&[n], global.quiet, color),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification receiver lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    live.shutdown().await;
    Ok(())
}
