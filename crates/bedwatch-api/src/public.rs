// Patient-facing endpoints.
//
// Read-only, aggregated data; no session required.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AlertsResponse, CityRecommendation, HospitalAvailability, HospitalComparison,
    HospitalForecast, PublicHospitalInfo,
};

fn city_param(city: Option<&str>) -> Vec<(&'static str, String)> {
    city.map(|c| vec![("city", c.to_owned())]).unwrap_or_default()
}

impl ApiClient {
    /// `GET public/hospitals[?city=]`
    pub async fn public_hospitals(
        &self,
        city: Option<&str>,
    ) -> Result<Vec<PublicHospitalInfo>, Error> {
        self.get_with_params("public/hospitals", &city_param(city))
            .await
    }

    /// `GET public/availability/{id}`
    pub async fn public_availability(&self, id: i64) -> Result<HospitalAvailability, Error> {
        self.get(&format!("public/availability/{id}")).await
    }

    /// `GET public/forecast/{id}?days=N` (the backend accepts 1-14).
    pub async fn public_forecast(&self, id: i64, days: u32) -> Result<HospitalForecast, Error> {
        self.get_with_params(
            &format!("public/forecast/{id}"),
            &[("days", days.to_string())],
        )
        .await
    }

    /// Hospitals ranked by recommendation score, best first.
    ///
    /// `GET public/compare[?city=]`
    pub async fn public_compare(
        &self,
        city: Option<&str>,
    ) -> Result<Vec<HospitalComparison>, Error> {
        self.get_with_params("public/compare", &city_param(city))
            .await
    }

    /// `GET public/recommendation/{city}`
    pub async fn public_recommendation(&self, city: &str) -> Result<CityRecommendation, Error> {
        self.get_segments(&["public", "recommendation", city]).await
    }

    /// `GET public/alerts/{id}`
    pub async fn public_alerts(&self, id: i64) -> Result<AlertsResponse, Error> {
        self.get(&format!("public/alerts/{id}")).await
    }
}
