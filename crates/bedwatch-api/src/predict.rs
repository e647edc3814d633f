// Forecast and dashboard endpoints.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{DashboardSnapshot, PredictionResponse};

impl ApiClient {
    /// Occupancy forecast for the next `days` days (the backend accepts 1-30).
    ///
    /// `GET predict/{id}?days=N`. Answers `400` when the hospital has too
    /// little history, see [`Error::is_insufficient_data`].
    pub async fn get_predictions(&self, id: i64, days: u32) -> Result<PredictionResponse, Error> {
        self.get_with_params(&format!("predict/{id}"), &[("days", days.to_string())])
            .await
    }

    /// Complete dashboard payload: metrics, history, 7-day forecast, alerts.
    ///
    /// `GET dashboard/{id}`
    pub async fn get_dashboard(&self, id: i64) -> Result<DashboardSnapshot, Error> {
        self.get(&format!("dashboard/{id}")).await
    }
}
