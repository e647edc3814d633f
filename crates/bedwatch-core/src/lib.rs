//! Domain layer between `bedwatch-api` and front ends.
//!
//! - **[`Monitor`]**: cloneable facade over the API client. Every backend
//!   operation returns [`CoreError`]; it also hands out views and live-update
//!   tasks wired to itself.
//!
//! - **[`DashboardView`]**: per-hospital monitoring state (hospital selector,
//!   current snapshot, [`ViewState`]) with demo fallbacks and alert
//!   notifications on every snapshot change.
//!
//! - **[`HospitalsView`]**: admin listing with search, aggregate stats, the
//!   validated creation form, and a details slot.
//!
//! - **[`RecordsView`]**: EHR records of one hospital, with the same demo
//!   fallback as the dashboard.
//!
//! - **[`LiveUpdates`]**: cancellable background polling that announces large
//!   utilization swings through the [`Notifier`].

pub mod alerts;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod hospitals;
pub mod live;
pub mod monitor;
pub mod notify;
pub mod records;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{MonitorConfig, TlsVerification};
pub use dashboard::{DashboardView, ViewState};
pub use error::{CoreError, FormError};
pub use hospitals::{HospitalForm, HospitalStats, HospitalsView};
pub use live::{LiveUpdates, UtilizationChange, UtilizationWatch};
pub use monitor::{DashboardBackend, Monitor};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use records::RecordsView;

pub use bedwatch_api::MemorySession;

// The wire types consumers render.
pub use bedwatch_api::{
    Alert, AlertSeverity, AlertsResponse, AvailabilityAlert, AvailabilityStatus, CityRecommendation,
    DashboardSnapshot, DayForecast, EhrRecord, EhrRecordCreate, HistoricalPoint, Hospital,
    HospitalAvailability, HospitalComparison, HospitalCreate, HospitalForecast, HospitalUpdate,
    IntegrationConfig, OverallStatus, PredictionPoint, PredictionResponse, PublicAlertSeverity,
    PublicHospitalInfo, RiskLevel, SessionProvider, SyncResult,
};
