// ── Live updates ──
//
// Background polling of one hospital's dashboard. Each result is compared
// with the previous one and large utilization swings are announced through
// the notifier before the caller's callback sees the new snapshot.

use std::future::Future;
use std::time::Duration;

use bedwatch_api::DashboardSnapshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::notify::{Notification, Notifier};

/// Swings larger than this many percentage points are announced.
pub const CHANGE_THRESHOLD_PCT: f64 = 5.0;

/// Crossing upward through this utilization raises a critical notification.
pub const CRITICAL_UTILIZATION_PCT: f64 = 90.0;

const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

// ── UtilizationWatch ─────────────────────────────────────────────

/// A noteworthy change between two consecutive utilization readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UtilizationChange {
    Increase { from: f64, to: f64 },
    Decrease { from: f64, to: f64 },
    Critical { from: f64, to: f64 },
}

impl UtilizationChange {
    pub fn to_notification(self) -> Notification {
        match self {
            Self::Increase { from, to } => Notification::warning(format!(
                "Occupancy increased by {:.1}% ({from:.1}% -> {to:.1}%)",
                to - from
            )),
            Self::Decrease { from, to } => Notification::success(format!(
                "Occupancy decreased by {:.1}% ({from:.1}% -> {to:.1}%)",
                from - to
            )),
            Self::Critical { to, .. } => {
                Notification::critical(format!("Critical occupancy level reached: {to:.1}%"))
            }
        }
    }
}

/// Remembers the previous utilization reading.
#[derive(Debug, Default)]
pub struct UtilizationWatch {
    previous: Option<f64>,
}

impl UtilizationWatch {
    /// Compare `current` with the previous reading, then remember it.
    pub fn observe(&mut self, current: f64) -> Vec<UtilizationChange> {
        let mut changes = Vec::new();

        if let Some(from) = self.previous.replace(current) {
            let delta = current - from;
            if delta.abs() > CHANGE_THRESHOLD_PCT {
                changes.push(if delta > 0.0 {
                    UtilizationChange::Increase { from, to: current }
                } else {
                    UtilizationChange::Decrease { from, to: current }
                });
            }
            if from < CRITICAL_UTILIZATION_PCT && current >= CRITICAL_UTILIZATION_PCT {
                changes.push(UtilizationChange::Critical { from, to: current });
            }
        }

        changes
    }
}

// ── LiveUpdates ──────────────────────────────────────────────────

/// Handle to a running poll task. Dropping it stops the task.
#[derive(Debug)]
pub struct LiveUpdates {
    target: i64,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl LiveUpdates {
    /// Fetch `target` immediately, then every `period`, until cancelled.
    ///
    /// Returns `None` without spawning anything when `target` is `None`.
    /// Fetch failures are logged and the schedule continues.
    pub fn spawn<F, Fut, U>(
        target: Option<i64>,
        period: Duration,
        fetch: F,
        on_update: U,
        notifier: Notifier,
    ) -> Option<Self>
    where
        F: Fn(i64) -> Fut + Send + 'static,
        Fut: Future<Output = Result<DashboardSnapshot, CoreError>> + Send + 'static,
        U: FnMut(DashboardSnapshot) + Send + 'static,
    {
        let target = target?;
        let period = period.max(MIN_POLL_INTERVAL);
        let cancel = CancellationToken::new();

        info!(hospital_id = target, interval_secs = period.as_secs(), "live updates started");
        let handle = tokio::spawn(poll_task(
            target,
            period,
            fetch,
            on_update,
            notifier,
            cancel.clone(),
        ));

        Some(Self {
            target,
            cancel,
            handle: Some(handle),
        })
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// Stop polling. A fetch already in flight is abandoned.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for LiveUpdates {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_task<F, Fut, U>(
    target: i64,
    period: Duration,
    fetch: F,
    mut on_update: U,
    notifier: Notifier,
    cancel: CancellationToken,
) where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<DashboardSnapshot, CoreError>>,
    U: FnMut(DashboardSnapshot),
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut watch = UtilizationWatch::default();

    loop {
        // The first tick completes immediately.
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = fetch(target) => result,
        };

        match result {
            Ok(snap) => {
                for change in watch.observe(snap.current_utilization) {
                    notifier.notify(change.to_notification());
                }
                on_update(snap);
            }
            Err(e) => warn!(hospital_id = target, error = %e, "live update failed"),
        }
    }

    debug!(hospital_id = target, "live updates stopped");
}
