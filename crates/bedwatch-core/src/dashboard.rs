// ── Dashboard view ──
//
// Per-hospital monitoring view: hospital selector, current snapshot, and
// the alert notifications raised as snapshots change. Falls back to demo
// data when the backend has nothing usable.

use std::sync::Arc;

use bedwatch_api::{DashboardSnapshot, Hospital, PredictionPoint};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::alerts::AlertTracker;
use crate::demo::{demo_hospitals, demo_predictions, demo_snapshot};
use crate::monitor::DashboardBackend;
use crate::notify::{Notification, Notifier};

/// Loading state of the dashboard for the selected hospital.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    /// Fetch failed and demo fallback is disabled.
    Error(String),
    Ready,
}

pub struct DashboardView<B> {
    backend: Arc<B>,
    notifier: Notifier,
    demo_fallback: bool,
    hospitals: Vec<Hospital>,
    hospitals_are_demo: bool,
    selected: Option<i64>,
    snapshot: Option<DashboardSnapshot>,
    snapshot_is_demo: bool,
    state: ViewState,
    alerts: AlertTracker,
}

impl<B: DashboardBackend> DashboardView<B> {
    pub fn new(backend: Arc<B>, notifier: Notifier, demo_fallback: bool) -> Self {
        Self {
            backend,
            notifier,
            demo_fallback,
            hospitals: Vec::new(),
            hospitals_are_demo: false,
            selected: None,
            snapshot: None,
            snapshot_is_demo: false,
            state: ViewState::Loading,
            alerts: AlertTracker::default(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load the hospital list, select the first entry if nothing is
    /// selected yet, and fetch its dashboard.
    pub async fn mount(&mut self) {
        self.load_hospitals().await;
        if self.selected.is_none() {
            if let Some(first) = self.hospitals.first().map(|h| h.id) {
                self.select(first).await;
            }
        }
    }

    async fn load_hospitals(&mut self) {
        match self.backend.list_hospitals().await {
            Ok(hospitals) => {
                debug!(count = hospitals.len(), "hospital list loaded");
                self.hospitals = hospitals;
                self.hospitals_are_demo = false;
            }
            Err(e) => {
                warn!(error = %e, "hospital list unavailable; showing demo hospitals");
                self.hospitals = demo_hospitals();
                self.hospitals_are_demo = true;
            }
        }
    }

    /// Switch to `hospital_id`. Re-selecting the current hospital is a no-op;
    /// use [`refresh`](Self::refresh) to refetch.
    pub async fn select(&mut self, hospital_id: i64) {
        if self.selected == Some(hospital_id) {
            return;
        }
        self.selected = Some(hospital_id);
        self.fetch_snapshot(hospital_id).await;
    }

    /// Refetch the dashboard for the current selection.
    pub async fn refresh(&mut self) {
        if let Some(id) = self.selected {
            self.fetch_snapshot(id).await;
        }
    }

    async fn fetch_snapshot(&mut self, hospital_id: i64) {
        self.state = ViewState::Loading;

        match self.backend.dashboard(hospital_id).await {
            Ok(mut snap) => {
                if snap.predictions.is_empty() {
                    info!(hospital_id, "no predictions returned; using demo forecast");
                    snap.predictions = demo_predictions(hospital_id, today());
                    self.notifier.notify(Notification::info(
                        "Showing demo predictions: not enough history to forecast yet",
                    ));
                }
                self.snapshot_is_demo = false;
                self.apply_snapshot(snap);
            }
            Err(e) if self.demo_fallback => {
                warn!(hospital_id, error = %e, "dashboard unavailable; showing demo snapshot");
                self.notifier.notify(Notification::warning(format!(
                    "Backend unavailable, showing demo data ({e})"
                )));
                self.snapshot_is_demo = true;
                self.apply_snapshot(demo_snapshot(hospital_id, today()));
            }
            Err(e) => {
                warn!(hospital_id, error = %e, "dashboard fetch failed");
                self.notifier
                    .notify(Notification::error(format!("Failed to load dashboard: {e}")));
                self.state = ViewState::Error(e.to_string());
            }
        }
    }

    /// Install a new snapshot, notifying for every alert not present in the
    /// previous one. Used by fetches and by live updates.
    pub fn apply_snapshot(&mut self, snap: DashboardSnapshot) {
        for notification in self.alerts.observe(&snap.alerts) {
            self.notifier.notify(notification);
        }
        self.snapshot = Some(snap);
        self.state = ViewState::Ready;
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn hospitals_are_demo(&self) -> bool {
        self.hospitals_are_demo
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn snapshot_is_demo(&self) -> bool {
        self.snapshot_is_demo
    }

    pub fn peak_forecast(&self) -> Option<f64> {
        self.snapshot.as_ref().and_then(|s| peak_forecast(&s.predictions))
    }

    pub fn capacity_available_pct(&self) -> Option<i64> {
        self.snapshot
            .as_ref()
            .and_then(|s| capacity_available_pct(s.total_beds, s.current_occupied))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ── Derived values ───────────────────────────────────────────────

/// Highest finite predicted occupancy. `None` when there is nothing finite
/// to compare.
pub fn peak_forecast(predictions: &[PredictionPoint]) -> Option<f64> {
    predictions
        .iter()
        .map(|p| p.predicted_occupancy)
        .filter(|v| v.is_finite())
        .reduce(f64::max)
}

/// Share of beds still free, rounded to a whole percent. `None` for a
/// hospital with no beds.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn capacity_available_pct(total_beds: i64, occupied: i64) -> Option<i64> {
    if total_beds <= 0 {
        return None;
    }
    let free = (total_beds - occupied) as f64 / total_beds as f64 * 100.0;
    Some(free.round() as i64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bedwatch_api::AlertSeverity;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::demo::DEMO_SENTINEL_ID;
    use crate::notify::{NotificationLevel, drain};
    use crate::testing::{FakeBackend, alert, hospital, snapshot};

    fn make_view(
        fake: FakeBackend,
        demo_fallback: bool,
    ) -> (DashboardView<FakeBackend>, Arc<FakeBackend>) {
        let fake = Arc::new(fake);
        (DashboardView::new(fake.clone(), Notifier::new(), demo_fallback), fake)
    }

    fn point(value: f64) -> PredictionPoint {
        PredictionPoint {
            date: "2025-03-02".into(),
            predicted_occupancy: value,
            lower_bound: value,
            upper_bound: value,
        }
    }

    // ── Derived values ───────────────────────────────────────────

    #[test]
    fn peak_ignores_non_finite_values() {
        assert_eq!(peak_forecast(&[point(120.0), point(f64::NAN), point(181.5)]), Some(181.5));
        assert_eq!(peak_forecast(&[point(f64::NAN), point(f64::INFINITY)]), None);
        assert_eq!(peak_forecast(&[]), None);
    }

    #[test]
    fn capacity_rounds_and_guards_zero_total() {
        assert_eq!(capacity_available_pct(250, 175), Some(30));
        assert_eq!(capacity_available_pct(3, 1), Some(67));
        assert_eq!(capacity_available_pct(0, 0), None);
    }

    // ── Mount & selection ────────────────────────────────────────

    #[tokio::test]
    async fn failed_hospital_list_falls_back_to_demo_hospitals() {
        let (mut view, _) = make_view(FakeBackend::default(), true);

        view.mount().await;

        let summary: Vec<_> = view
            .hospitals()
            .iter()
            .map(|h| (h.id, h.total_beds, h.icu_beds))
            .collect();
        assert_eq!(summary, vec![(1, 250, 30), (2, 180, 25)]);
        assert!(view.hospitals_are_demo());
        assert_eq!(view.selected(), Some(1));
    }

    #[tokio::test]
    async fn mount_selects_first_hospital_and_loads_it() {
        let fake = FakeBackend::with_hospitals(vec![
            hospital(7, "KEM Hospital", "Mumbai, Maharashtra", 400, 40),
            hospital(8, "Ruby Hall", "Pune, Maharashtra", 300, 30),
        ]);
        fake.set_dashboard(snapshot(7, 75.0));
        let (mut view, fake) = make_view(fake, true);

        view.mount().await;

        assert_eq!(view.selected(), Some(7));
        assert_eq!(view.state(), &ViewState::Ready);
        assert_eq!(view.snapshot().unwrap().hospital_id, 7);
        assert!(!view.snapshot_is_demo());

        // Same id again: no refetch. Refresh: refetch.
        view.select(7).await;
        assert_eq!(fake.dashboard_calls(), 1);
        view.refresh().await;
        assert_eq!(fake.dashboard_calls(), 2);
    }

    #[tokio::test]
    async fn empty_list_selects_nothing() {
        let (mut view, fake) = make_view(FakeBackend::with_hospitals(Vec::new()), true);

        view.mount().await;

        assert_eq!(view.selected(), None);
        assert_eq!(view.state(), &ViewState::Loading);
        assert_eq!(fake.dashboard_calls(), 0);
    }

    // ── Fallbacks ────────────────────────────────────────────────

    #[tokio::test]
    async fn empty_predictions_are_replaced_by_demo_series() {
        let fake = FakeBackend::with_hospitals(vec![hospital(1, "A", "X", 250, 30)]);
        let mut snap = snapshot(DEMO_SENTINEL_ID, 60.0);
        snap.predictions.clear();
        fake.set_dashboard(snap);
        let (mut view, _) = make_view(fake, true);
        let mut rx = view.notifier.subscribe();

        view.mount().await;

        let values: Vec<_> = view
            .snapshot()
            .unwrap()
            .predictions
            .iter()
            .map(|p| p.predicted_occupancy)
            .collect();
        assert_eq!(values, vec![182.0, 188.0, 195.0, 201.0, 198.0, 190.0, 185.0]);
        assert_eq!(view.peak_forecast(), Some(201.0));

        let levels: Vec<_> = drain(&mut rx).into_iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![NotificationLevel::Info]);
    }

    #[tokio::test]
    async fn failed_dashboard_uses_demo_snapshot_with_warning() {
        let fake = FakeBackend::with_hospitals(vec![hospital(2, "B", "Y", 180, 25)]);
        let (mut view, _) = make_view(fake, true);
        let mut rx = view.notifier.subscribe();

        view.mount().await;

        let snap = view.snapshot().unwrap();
        assert!(view.snapshot_is_demo());
        assert_eq!(snap.current_occupied, 175);
        assert!((snap.predictions[0].predicted_occupancy - 128.0).abs() < f64::EPSILON);
        assert_eq!(view.capacity_available_pct(), Some(30));
        assert_eq!(view.state(), &ViewState::Ready);

        let got = drain(&mut rx);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].level, NotificationLevel::Warning);
    }

    #[tokio::test]
    async fn failed_dashboard_without_fallback_is_an_error_state() {
        let fake = FakeBackend::with_hospitals(vec![hospital(2, "B", "Y", 180, 25)]);
        let (mut view, _) = make_view(fake, false);

        view.mount().await;

        assert!(matches!(
            view.state(),
            ViewState::Error(reason) if reason.contains("connection refused")
        ));
        assert!(view.snapshot().is_none());
    }

    // ── Alerts ───────────────────────────────────────────────────

    #[tokio::test]
    async fn only_new_alerts_notify_across_refreshes() {
        let fake = FakeBackend::with_hospitals(vec![hospital(3, "C", "Z", 200, 20)]);
        let mut snap = snapshot(3, 82.0);
        snap.alerts = vec![alert("2025-03-02", AlertSeverity::Yellow)];
        fake.set_dashboard(snap.clone());
        let (mut view, fake) = make_view(fake, true);
        let mut rx = view.notifier.subscribe();

        view.mount().await;
        assert_eq!(drain(&mut rx).len(), 1);

        snap.alerts = vec![
            alert("2025-03-02", AlertSeverity::Yellow),
            alert("2025-03-03", AlertSeverity::Red),
        ];
        fake.set_dashboard(snap);
        view.refresh().await;

        let got = drain(&mut rx);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn live_snapshot_goes_through_alert_diff() {
        let (mut view, _) = make_view(FakeBackend::default(), true);
        let mut rx = view.notifier.subscribe();

        let mut snap = snapshot(1, 91.0);
        snap.alerts = vec![alert("2025-03-05", AlertSeverity::Green)];
        view.apply_snapshot(snap.clone());
        view.apply_snapshot(snap);

        let got = drain(&mut rx);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].level, NotificationLevel::Info);
        assert_eq!(view.state(), &ViewState::Ready);
    }
}
