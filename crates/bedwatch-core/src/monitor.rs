// ── Monitor facade ──
//
// Single entry point for front ends. Wraps the API client, translates its
// errors into `CoreError`, owns the notifier, and hands out views and
// live-update tasks wired to itself.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bedwatch_api::{
    AlertsResponse, ApiClient, CityRecommendation, DashboardSnapshot, EhrRecord, EhrRecordCreate,
    Hospital, HospitalAvailability, HospitalComparison, HospitalCreate, HospitalForecast,
    HospitalUpdate, IntegrationConfig, PredictionResponse, PublicHospitalInfo, SessionProvider,
    SyncResult, TlsMode, TransportConfig,
};
use secrecy::SecretString;
use tracing::info;

use crate::config::{MonitorConfig, TlsVerification};
use crate::dashboard::DashboardView;
use crate::error::CoreError;
use crate::hospitals::HospitalsView;
use crate::live::LiveUpdates;
use crate::notify::Notifier;
use crate::records::RecordsView;

// ── DashboardBackend ─────────────────────────────────────────────

/// The backend operations the views depend on.
///
/// [`Monitor`] is the production implementation; tests substitute an
/// in-memory fake.
pub trait DashboardBackend: Send + Sync + 'static {
    fn list_hospitals(&self) -> impl Future<Output = Result<Vec<Hospital>, CoreError>> + Send;

    fn dashboard(
        &self,
        hospital_id: i64,
    ) -> impl Future<Output = Result<DashboardSnapshot, CoreError>> + Send;

    fn create_hospital(
        &self,
        body: &HospitalCreate,
    ) -> impl Future<Output = Result<Hospital, CoreError>> + Send;

    fn list_ehr_records(
        &self,
        hospital_id: i64,
    ) -> impl Future<Output = Result<Vec<EhrRecord>, CoreError>> + Send;
}

// ── Monitor ──────────────────────────────────────────────────────

/// Cheaply cloneable handle to one backend.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: ApiClient,
    notifier: Notifier,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("api_url", &self.inner.config.api_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Monitor {
    /// Build a monitor. No request is made until an operation is called.
    pub fn new(config: MonitorConfig, session: Arc<dyn SessionProvider>) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.api_url.as_str(), session, &build_transport(&config))?;
        Ok(Self::with_client(config, client))
    }

    /// Wrap an already constructed client.
    pub fn with_client(config: MonitorConfig, client: ApiClient) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                notifier: Notifier::new(),
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    // ── Views & live updates ─────────────────────────────────────

    pub fn dashboard_view(&self) -> DashboardView<Self> {
        DashboardView::new(
            Arc::new(self.clone()),
            self.inner.notifier.clone(),
            self.inner.config.demo_fallback,
        )
    }

    pub fn hospitals_view(&self) -> HospitalsView<Self> {
        HospitalsView::new(Arc::new(self.clone()), self.inner.notifier.clone())
    }

    pub fn records_view(&self) -> RecordsView<Self> {
        RecordsView::new(
            Arc::new(self.clone()),
            self.inner.notifier.clone(),
            self.inner.config.demo_fallback,
        )
    }

    /// Poll the dashboard of `target` every configured interval.
    ///
    /// Returns `None` (and spawns nothing) when there is no target. To follow
    /// a different hospital, drop the old handle and call this again.
    pub fn live_updates<U>(&self, target: Option<i64>, on_update: U) -> Option<LiveUpdates>
    where
        U: FnMut(DashboardSnapshot) + Send + 'static,
    {
        self.live_updates_every(target, self.inner.config.poll_interval, on_update)
    }

    /// Like [`live_updates`](Self::live_updates) with an explicit interval.
    pub fn live_updates_every<U>(
        &self,
        target: Option<i64>,
        period: Duration,
        on_update: U,
    ) -> Option<LiveUpdates>
    where
        U: FnMut(DashboardSnapshot) + Send + 'static,
    {
        let monitor = self.clone();
        LiveUpdates::spawn(
            target,
            period,
            move |id| {
                let monitor = monitor.clone();
                async move { monitor.dashboard(id).await }
            },
            on_update,
            self.inner.notifier.clone(),
        )
    }

    // ── Session ──────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        self.inner.client.login(email, password).await?;
        info!(email, "logged in");
        Ok(())
    }

    pub fn logout(&self) {
        self.inner.client.logout();
        info!("logged out");
    }

    pub fn has_session(&self) -> bool {
        self.inner.client.session().token().is_some()
    }

    // ── Hospitals ────────────────────────────────────────────────

    pub async fn list_hospitals(&self) -> Result<Vec<Hospital>, CoreError> {
        Ok(self.inner.client.list_hospitals().await?)
    }

    pub async fn get_hospital(&self, id: i64) -> Result<Hospital, CoreError> {
        Ok(self.inner.client.get_hospital(id).await?)
    }

    pub async fn create_hospital(&self, body: &HospitalCreate) -> Result<Hospital, CoreError> {
        Ok(self.inner.client.create_hospital(body).await?)
    }

    pub async fn update_hospital(
        &self,
        id: i64,
        body: &HospitalUpdate,
    ) -> Result<Hospital, CoreError> {
        if body.is_empty() {
            return Err(CoreError::Config {
                message: "nothing to update: pass at least one field".into(),
            });
        }
        Ok(self.inner.client.update_hospital(id, body).await?)
    }

    pub async fn update_integration(
        &self,
        id: i64,
        body: &IntegrationConfig,
    ) -> Result<Hospital, CoreError> {
        Ok(self.inner.client.update_integration(id, body).await?)
    }

    pub async fn trigger_sync(&self, id: i64) -> Result<SyncResult, CoreError> {
        Ok(self.inner.client.trigger_sync(id).await?)
    }

    // ── EHR ──────────────────────────────────────────────────────

    pub async fn list_ehr_records(&self, hospital_id: i64) -> Result<Vec<EhrRecord>, CoreError> {
        Ok(self.inner.client.list_ehr_records(hospital_id).await?)
    }

    pub async fn get_ehr_record(&self, id: i64) -> Result<EhrRecord, CoreError> {
        Ok(self.inner.client.get_ehr_record(id).await?)
    }

    pub async fn create_ehr_record(&self, body: &EhrRecordCreate) -> Result<EhrRecord, CoreError> {
        Ok(self.inner.client.create_ehr_record(body).await?)
    }

    // ── Predictions & dashboard ──────────────────────────────────

    pub async fn predictions(&self, id: i64, days: u32) -> Result<PredictionResponse, CoreError> {
        Ok(self.inner.client.get_predictions(id, days).await?)
    }

    pub async fn dashboard(&self, id: i64) -> Result<DashboardSnapshot, CoreError> {
        Ok(self.inner.client.get_dashboard(id).await?)
    }

    // ── Public ───────────────────────────────────────────────────

    pub async fn public_hospitals(
        &self,
        city: Option<&str>,
    ) -> Result<Vec<PublicHospitalInfo>, CoreError> {
        Ok(self.inner.client.public_hospitals(city).await?)
    }

    pub async fn public_availability(&self, id: i64) -> Result<HospitalAvailability, CoreError> {
        Ok(self.inner.client.public_availability(id).await?)
    }

    pub async fn public_forecast(&self, id: i64, days: u32) -> Result<HospitalForecast, CoreError> {
        Ok(self.inner.client.public_forecast(id, days).await?)
    }

    pub async fn public_compare(
        &self,
        city: Option<&str>,
    ) -> Result<Vec<HospitalComparison>, CoreError> {
        Ok(self.inner.client.public_compare(city).await?)
    }

    pub async fn public_recommendation(&self, city: &str) -> Result<CityRecommendation, CoreError> {
        Ok(self.inner.client.public_recommendation(city).await?)
    }

    pub async fn public_alerts(&self, id: i64) -> Result<AlertsResponse, CoreError> {
        Ok(self.inner.client.public_alerts(id).await?)
    }
}

impl DashboardBackend for Monitor {
    async fn list_hospitals(&self) -> Result<Vec<Hospital>, CoreError> {
        Monitor::list_hospitals(self).await
    }

    async fn dashboard(&self, hospital_id: i64) -> Result<DashboardSnapshot, CoreError> {
        Monitor::dashboard(self, hospital_id).await
    }

    async fn create_hospital(&self, body: &HospitalCreate) -> Result<Hospital, CoreError> {
        Monitor::create_hospital(self, body).await
    }

    async fn list_ehr_records(&self, hospital_id: i64) -> Result<Vec<EhrRecord>, CoreError> {
        Monitor::list_ehr_records(self, hospital_id).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the monitor configuration.
fn build_transport(config: &MonitorConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
