// ── EHR records view ──
//
// Daily occupancy records of one hospital, with the demo substitution the
// dashboard also applies.

use std::sync::Arc;

use bedwatch_api::EhrRecord;
use chrono::Local;
use tracing::{debug, warn};

use crate::demo::demo_ehr_records;
use crate::error::CoreError;
use crate::monitor::DashboardBackend;
use crate::notify::{Notification, Notifier};

pub struct RecordsView<B> {
    backend: Arc<B>,
    notifier: Notifier,
    demo_fallback: bool,
    records: Vec<EhrRecord>,
    records_are_demo: bool,
}

impl<B: DashboardBackend> RecordsView<B> {
    pub fn new(backend: Arc<B>, notifier: Notifier, demo_fallback: bool) -> Self {
        Self {
            backend,
            notifier,
            demo_fallback,
            records: Vec::new(),
            records_are_demo: false,
        }
    }

    /// Fetch the records of `hospital_id`.
    ///
    /// With demo fallback on, a failed fetch installs the fixed demo week and
    /// still succeeds. Otherwise the error is returned and the previous
    /// records stay.
    pub async fn load(&mut self, hospital_id: i64) -> Result<&[EhrRecord], CoreError> {
        match self.backend.list_ehr_records(hospital_id).await {
            Ok(records) => {
                debug!(hospital_id, count = records.len(), "EHR records loaded");
                self.records = records;
                self.records_are_demo = false;
            }
            Err(e) if self.demo_fallback => {
                warn!(hospital_id, error = %e, "EHR records unavailable; showing demo records");
                self.notifier.notify(Notification::warning(format!(
                    "Backend unavailable, showing demo records ({e})"
                )));
                self.records = demo_ehr_records(hospital_id, Local::now().date_naive());
                self.records_are_demo = true;
            }
            Err(e) => {
                warn!(hospital_id, error = %e, "failed to load EHR records");
                self.notifier
                    .notify(Notification::error(format!("Failed to load EHR records: {e}")));
                return Err(e);
            }
        }
        Ok(&self.records)
    }

    pub fn records(&self) -> &[EhrRecord] {
        &self.records
    }

    pub fn records_are_demo(&self) -> bool {
        self.records_are_demo
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notify::{NotificationLevel, drain};
    use crate::testing::{FakeBackend, ehr_record};

    fn make_view(fake: FakeBackend, demo_fallback: bool) -> RecordsView<FakeBackend> {
        RecordsView::new(Arc::new(fake), Notifier::new(), demo_fallback)
    }

    #[tokio::test]
    async fn loads_only_the_requested_hospital() {
        let fake = FakeBackend::default();
        *fake.records.lock().unwrap() = Some(vec![
            ehr_record(1, 3, "2025-03-01", 120),
            ehr_record(2, 4, "2025-03-01", 90),
            ehr_record(3, 3, "2025-03-02", 125),
        ]);
        let mut view = make_view(fake, true);
        let mut rx = view.notifier.subscribe();

        let ids: Vec<_> = view.load(3).await.unwrap().iter().map(|r| r.id).collect();

        assert_eq!(ids, vec![1, 3]);
        assert!(!view.records_are_demo());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_shows_demo_week() {
        let mut view = make_view(FakeBackend::default(), true);
        let mut rx = view.notifier.subscribe();

        let records = view.load(5).await.unwrap();

        assert_eq!(records.len(), 7);
        assert!(records.iter().all(|r| r.hospital_id == 5));
        assert_eq!(records[6].date, Local::now().date_naive().format("%Y-%m-%d").to_string());
        assert!(view.records_are_demo());

        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Warning);
        assert!(notes[0].message.contains("demo records"));
        assert!(notes[0].message.contains("connection refused"));
    }

    #[tokio::test]
    async fn without_fallback_the_error_propagates() {
        let fake = FakeBackend::default();
        *fake.records.lock().unwrap() = Some(vec![ehr_record(1, 3, "2025-03-01", 120)]);
        let fake = Arc::new(fake);
        let mut view = RecordsView::new(fake.clone(), Notifier::new(), false);
        let mut rx = view.notifier.subscribe();
        view.load(3).await.unwrap();

        *fake.records.lock().unwrap() = None;
        let err = view.load(3).await.unwrap_err();

        assert!(matches!(err, CoreError::ConnectionFailed { .. }));
        assert!(!view.records_are_demo());
        assert_eq!(view.records().len(), 1);

        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
    }
}
