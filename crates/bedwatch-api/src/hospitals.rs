// Hospital administration endpoints.
//
// All of these require a hospital-admin session.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Hospital, HospitalCreate, HospitalUpdate, IntegrationConfig, SyncResult};

impl ApiClient {
    /// List every hospital visible to the session.
    ///
    /// `GET hospitals`
    pub async fn list_hospitals(&self) -> Result<Vec<Hospital>, Error> {
        debug!("listing hospitals");
        self.get("hospitals").await
    }

    /// `GET hospitals/{id}`
    pub async fn get_hospital(&self, id: i64) -> Result<Hospital, Error> {
        self.get(&format!("hospitals/{id}")).await
    }

    /// `POST hospitals`
    pub async fn create_hospital(&self, body: &HospitalCreate) -> Result<Hospital, Error> {
        debug!(name = %body.hospital_name, "creating hospital");
        self.post("hospitals", body).await
    }

    /// `PUT hospitals/{id}` with only the fields being changed.
    pub async fn update_hospital(&self, id: i64, body: &HospitalUpdate) -> Result<Hospital, Error> {
        debug!(id, "updating hospital");
        self.put(&format!("hospitals/{id}"), body).await
    }

    /// Point the backend at the hospital's own EHR feed.
    ///
    /// `PUT hospitals/{id}/integration`
    pub async fn update_integration(
        &self,
        id: i64,
        config: &IntegrationConfig,
    ) -> Result<Hospital, Error> {
        debug!(id, endpoint = %config.api_endpoint, "updating integration config");
        self.put(&format!("hospitals/{id}/integration"), config).await
    }

    /// Ask the backend to pull fresh records from the configured feed now.
    ///
    /// `POST hospitals/{id}/sync`
    pub async fn trigger_sync(&self, id: i64) -> Result<SyncResult, Error> {
        debug!(id, "triggering sync");
        self.post_empty(&format!("hospitals/{id}/sync")).await
    }
}
