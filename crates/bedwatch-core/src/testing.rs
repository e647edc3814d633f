// In-memory backend for view tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bedwatch_api::{
    Alert, AlertSeverity, DashboardSnapshot, EhrRecord, Hospital, HospitalCreate, OverallStatus,
    PredictionPoint,
};

use crate::error::CoreError;
use crate::monitor::DashboardBackend;

#[derive(Default)]
pub(crate) struct FakeBackend {
    /// `None` makes `list_hospitals` fail.
    pub hospitals: Mutex<Option<Vec<Hospital>>>,
    /// Missing ids make `dashboard` fail.
    pub dashboards: Mutex<HashMap<i64, DashboardSnapshot>>,
    /// `None` makes `list_ehr_records` fail.
    pub records: Mutex<Option<Vec<EhrRecord>>>,
    pub created: Mutex<Vec<HospitalCreate>>,
    pub reject_create: Mutex<Option<String>>,
    /// Makes `list_hospitals` fail regardless of `hospitals`.
    pub fail_list: AtomicBool,
    pub dashboard_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_hospitals(hospitals: Vec<Hospital>) -> Self {
        let fake = Self::default();
        *fake.hospitals.lock().unwrap() = Some(hospitals);
        fake
    }

    pub fn set_dashboard(&self, snap: DashboardSnapshot) {
        self.dashboards.lock().unwrap().insert(snap.hospital_id, snap);
    }

    pub fn dashboard_calls(&self) -> usize {
        self.dashboard_calls.load(Ordering::SeqCst)
    }
}

fn unreachable_backend() -> CoreError {
    CoreError::ConnectionFailed {
        url: "http://fake.invalid/api/".into(),
        reason: "connection refused".into(),
    }
}

impl DashboardBackend for FakeBackend {
    async fn list_hospitals(&self) -> Result<Vec<Hospital>, CoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(unreachable_backend());
        }
        self.hospitals.lock().unwrap().clone().ok_or_else(unreachable_backend)
    }

    async fn dashboard(&self, hospital_id: i64) -> Result<DashboardSnapshot, CoreError> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        self.dashboards
            .lock()
            .unwrap()
            .get(&hospital_id)
            .cloned()
            .ok_or_else(unreachable_backend)
    }

    async fn create_hospital(&self, body: &HospitalCreate) -> Result<Hospital, CoreError> {
        if let Some(message) = self.reject_create.lock().unwrap().clone() {
            return Err(CoreError::Api {
                message,
                status: Some(422),
            });
        }
        self.created.lock().unwrap().push(body.clone());

        let mut guard = self.hospitals.lock().unwrap();
        let list = guard.get_or_insert_with(Vec::new);
        let created = hospital(
            i64::try_from(list.len()).unwrap() + 1,
            &body.hospital_name,
            &body.location,
            body.total_beds,
            body.icu_beds,
        );
        list.push(created.clone());
        Ok(created)
    }

    async fn list_ehr_records(&self, hospital_id: i64) -> Result<Vec<EhrRecord>, CoreError> {
        let records = self.records.lock().unwrap().clone().ok_or_else(unreachable_backend)?;
        Ok(records.into_iter().filter(|r| r.hospital_id == hospital_id).collect())
    }
}

pub(crate) fn hospital(id: i64, name: &str, location: &str, total: i64, icu: i64) -> Hospital {
    Hospital {
        id,
        hospital_name: name.into(),
        location: location.into(),
        total_beds: total,
        icu_beds: icu,
        api_endpoint: None,
        sync_enabled: None,
        last_sync: None,
    }
}

pub(crate) fn snapshot(hospital_id: i64, utilization: f64) -> DashboardSnapshot {
    DashboardSnapshot {
        hospital_id,
        hospital_name: format!("Hospital {hospital_id}"),
        location: "Pune, Maharashtra".into(),
        total_beds: 200,
        icu_beds: 20,
        current_occupied: 150,
        current_icu_occupied: 12,
        current_utilization: utilization,
        historical_data: Vec::new(),
        predictions: vec![PredictionPoint {
            date: "2025-03-02".into(),
            predicted_occupancy: 160.0,
            lower_bound: 150.0,
            upper_bound: 170.0,
        }],
        alerts: Vec::new(),
        overall_status: OverallStatus::Green,
    }
}

pub(crate) fn alert(date: &str, severity: AlertSeverity) -> Alert {
    Alert {
        date: date.into(),
        severity,
        message: format!("{severity} alert"),
    }
}

pub(crate) fn ehr_record(id: i64, hospital_id: i64, date: &str, occupied: i64) -> EhrRecord {
    EhrRecord {
        id,
        hospital_id,
        date: date.into(),
        occupied_beds: occupied,
        admissions: 10,
        discharges: 9,
        icu_occupied: 4,
        emergency_cases: 2,
    }
}
