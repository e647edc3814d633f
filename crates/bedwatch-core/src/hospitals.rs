// ── Hospitals management view ──
//
// Admin listing with search, aggregate stats, a creation form, and a
// read-only details slot.

use std::collections::HashSet;
use std::sync::Arc;

use bedwatch_api::{DashboardSnapshot, Hospital, HospitalCreate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CoreError, FormError};
use crate::monitor::DashboardBackend;
use crate::notify::{Notification, Notifier};

// ── Form ─────────────────────────────────────────────────────────

/// Input for creating a hospital, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HospitalForm {
    pub name: String,
    pub location: String,
    pub total_beds: i64,
    pub icu_beds: i64,
}

impl HospitalForm {
    /// Trim the text fields and check the rules in order, stopping at the
    /// first violation.
    pub fn validate(&self) -> Result<HospitalCreate, FormError> {
        let name = self.name.trim();
        let location = self.location.trim();

        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        if location.is_empty() {
            return Err(FormError::MissingLocation);
        }
        if self.total_beds <= 0 {
            return Err(FormError::NonPositiveTotalBeds);
        }
        if self.icu_beds < 0 {
            return Err(FormError::NegativeIcuBeds);
        }
        if self.icu_beds > self.total_beds {
            return Err(FormError::IcuExceedsTotal {
                icu: self.icu_beds,
                total: self.total_beds,
            });
        }

        Ok(HospitalCreate {
            hospital_name: name.to_owned(),
            location: location.to_owned(),
            total_beds: self.total_beds,
            icu_beds: self.icu_beds,
        })
    }
}

// ── Stats & filtering ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HospitalStats {
    pub hospitals: usize,
    pub total_beds: i64,
    pub icu_beds: i64,
    pub locations: usize,
}

pub fn hospital_stats(hospitals: &[Hospital]) -> HospitalStats {
    HospitalStats {
        hospitals: hospitals.len(),
        total_beds: hospitals.iter().map(|h| h.total_beds).sum(),
        icu_beds: hospitals.iter().map(|h| h.icu_beds).sum(),
        locations: hospitals
            .iter()
            .map(|h| h.location.as_str())
            .collect::<HashSet<_>>()
            .len(),
    }
}

/// Case-insensitive substring match on name or location. An empty query
/// matches everything.
pub fn filter_hospitals<'a>(hospitals: &'a [Hospital], query: &str) -> Vec<&'a Hospital> {
    let needle = query.to_lowercase();
    hospitals
        .iter()
        .filter(|h| {
            h.hospital_name.to_lowercase().contains(&needle)
                || h.location.to_lowercase().contains(&needle)
        })
        .collect()
}

// ── View ─────────────────────────────────────────────────────────

pub struct HospitalsView<B> {
    backend: Arc<B>,
    notifier: Notifier,
    hospitals: Vec<Hospital>,
    load_error: Option<String>,
    form: HospitalForm,
    form_open: bool,
    details: Option<DashboardSnapshot>,
}

impl<B: DashboardBackend> HospitalsView<B> {
    pub fn new(backend: Arc<B>, notifier: Notifier) -> Self {
        Self {
            backend,
            notifier,
            hospitals: Vec::new(),
            load_error: None,
            form: HospitalForm::default(),
            form_open: false,
            details: None,
        }
    }

    /// Fetch the full list, replacing whatever was loaded before.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        match self.backend.list_hospitals().await {
            Ok(hospitals) => {
                debug!(count = hospitals.len(), "hospitals loaded");
                self.hospitals = hospitals;
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load hospitals");
                self.notifier
                    .notify(Notification::error(format!("Failed to load hospitals: {e}")));
                self.load_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn filtered(&self, query: &str) -> Vec<&Hospital> {
        filter_hospitals(&self.hospitals, query)
    }

    pub fn stats(&self) -> HospitalStats {
        hospital_stats(&self.hospitals)
    }

    // ── Creation form ────────────────────────────────────────────

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn form(&self) -> &HospitalForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut HospitalForm {
        &mut self.form
    }

    /// Validate and create. On success the form is reset and closed and
    /// the list reloaded; on failure the form stays as it was. A failed
    /// reload is reported by [`load`](Self::load) and does not fail the
    /// submit.
    pub async fn submit(&mut self) -> Result<Hospital, CoreError> {
        let body = match self.form.validate() {
            Ok(body) => body,
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        let created = match self.backend.create_hospital(&body).await {
            Ok(h) => h,
            Err(e) => {
                self.notifier
                    .notify(Notification::error(format!("Failed to add hospital: {e}")));
                return Err(e);
            }
        };

        self.form = HospitalForm::default();
        self.form_open = false;
        self.notifier.notify(Notification::success(format!(
            "Hospital \"{}\" added",
            created.hospital_name
        )));
        let _ = self.load().await;
        Ok(created)
    }

    // ── Details & row actions ────────────────────────────────────

    /// Fetch the dashboard of one hospital into the details slot.
    pub async fn view_details(
        &mut self,
        hospital_id: i64,
    ) -> Result<&DashboardSnapshot, CoreError> {
        match self.backend.dashboard(hospital_id).await {
            Ok(snap) => Ok(&*self.details.insert(snap)),
            Err(e) => {
                self.notifier
                    .notify(Notification::error(format!("Failed to load details: {e}")));
                Err(e)
            }
        }
    }

    pub fn details(&self) -> Option<&DashboardSnapshot> {
        self.details.as_ref()
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    /// Editing is not available yet; only announces that.
    pub fn edit(&self, hospital_id: i64) {
        self.notifier.notify(Notification::info(format!(
            "Editing hospital {hospital_id} is coming soon"
        )));
    }

    /// Deletion is not available yet; only announces that.
    pub fn delete(&self, hospital_id: i64) {
        self.notifier.notify(Notification::info(format!(
            "Deleting hospital {hospital_id} is coming soon"
        )));
    }
}
