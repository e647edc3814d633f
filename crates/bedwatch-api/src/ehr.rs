// EHR record endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{EhrRecord, EhrRecordCreate};

impl ApiClient {
    /// `GET ehr/hospital/{hospital_id}`
    pub async fn list_ehr_records(&self, hospital_id: i64) -> Result<Vec<EhrRecord>, Error> {
        debug!(hospital_id, "listing EHR records");
        self.get(&format!("ehr/hospital/{hospital_id}")).await
    }

    /// `GET ehr/{id}`
    pub async fn get_ehr_record(&self, id: i64) -> Result<EhrRecord, Error> {
        self.get(&format!("ehr/{id}")).await
    }

    /// `POST ehr`
    pub async fn create_ehr_record(&self, body: &EhrRecordCreate) -> Result<EhrRecord, Error> {
        debug!(hospital_id = body.hospital_id, date = %body.date, "creating EHR record");
        self.post("ehr", body).await
    }
}
