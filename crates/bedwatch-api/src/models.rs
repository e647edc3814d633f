// Wire types for the bedwatch backend.
//
// Field names follow the backend's snake_case JSON exactly. Dates are kept
// as the ISO strings the backend sends; the client never does date math on
// them.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

// ── Hospitals ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub hospital_name: String,
    pub location: String,
    pub total_beds: i64,
    pub icu_beds: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

/// Body of `POST hospitals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalCreate {
    pub hospital_name: String,
    pub location: String,
    pub total_beds: i64,
    pub icu_beds: i64,
}

/// Body of `PUT hospitals/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_beds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icu_beds: Option<i64>,
}

impl HospitalUpdate {
    pub fn is_empty(&self) -> bool {
        self.hospital_name.is_none()
            && self.location.is_none()
            && self.total_beds.is_none()
            && self.icu_beds.is_none()
    }
}

/// Body of `PUT hospitals/{id}/integration`: the hospital's own EHR feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    pub api_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub sync_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_interval_minutes: Option<u32>,
}

/// Response of `POST hospitals/{id}/sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub records_synced: Option<u64>,
}

// ── EHR ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EhrRecord {
    pub id: i64,
    pub hospital_id: i64,
    pub date: String,
    pub occupied_beds: i64,
    #[serde(default)]
    pub admissions: i64,
    #[serde(default)]
    pub discharges: i64,
    #[serde(default)]
    pub icu_occupied: i64,
    #[serde(default)]
    pub emergency_cases: i64,
}

/// Body of `POST ehr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EhrRecordCreate {
    pub hospital_id: i64,
    pub date: String,
    pub occupied_beds: i64,
    pub admissions: i64,
    pub discharges: i64,
    pub icu_occupied: i64,
    pub emergency_cases: i64,
}

// ── Predictions & dashboard ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: String,
    /// `null` on the wire decodes to NaN so it never wins a max.
    #[serde(deserialize_with = "nullable_f64")]
    pub predicted_occupancy: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub lower_bound: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub hospital_id: i64,
    pub hospital_name: String,
    pub total_beds: i64,
    #[serde(default)]
    pub predictions: Vec<PredictionPoint>,
    #[serde(default)]
    pub model_info: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: String,
    pub occupied_beds: i64,
    #[serde(default)]
    pub admissions: i64,
    #[serde(default)]
    pub discharges: i64,
    #[serde(default)]
    pub icu_occupied: i64,
    #[serde(default)]
    pub emergency_cases: i64,
    #[serde(default)]
    pub utilization: f64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    Red,
    Yellow,
    #[serde(alias = "info")]
    #[strum(to_string = "green", serialize = "info")]
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub date: String,
    pub severity: AlertSeverity,
    #[serde(default)]
    pub message: String,
}

impl Alert {
    /// Identity used to decide whether an alert has been seen before.
    pub fn key(&self) -> (&str, AlertSeverity) {
        (self.date.as_str(), self.severity)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OverallStatus {
    #[default]
    Green,
    Yellow,
    Red,
}

/// Full dashboard payload for one hospital. Replaced wholesale on each fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub hospital_id: i64,
    pub hospital_name: String,
    #[serde(default)]
    pub location: String,
    pub total_beds: i64,
    #[serde(default)]
    pub icu_beds: i64,
    pub current_occupied: i64,
    #[serde(default)]
    pub current_icu_occupied: i64,
    pub current_utilization: f64,
    #[serde(default)]
    pub historical_data: Vec<HistoricalPoint>,
    #[serde(default)]
    pub predictions: Vec<PredictionPoint>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub overall_status: OverallStatus,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".into()
}

// ── Public (patient-facing) ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHospitalInfo {
    pub id: i64,
    pub hospital_name: String,
    pub location: String,
    pub total_beds: i64,
    pub icu_beds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Moderate,
    High,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalAvailability {
    pub hospital_id: i64,
    pub hospital_name: String,
    pub location: String,
    pub total_beds: i64,
    pub current_occupied: i64,
    pub current_available: i64,
    pub utilization_percentage: f64,
    pub status: AvailabilityStatus,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: String,
    pub predicted_occupancy: i64,
    pub predicted_available: i64,
    pub utilization_percentage: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalForecast {
    pub hospital_id: i64,
    pub hospital_name: String,
    pub location: String,
    pub total_beds: i64,
    #[serde(default)]
    pub forecast: Vec<DayForecast>,
    #[serde(default)]
    pub best_day_to_visit: Option<String>,
    #[serde(default)]
    pub best_day_occupancy: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalComparison {
    pub hospital_id: i64,
    pub hospital_name: String,
    pub location: String,
    pub current_occupancy: i64,
    pub current_available: i64,
    pub utilization_percentage: f64,
    pub avg_predicted_occupancy_7_days: f64,
    pub recommendation_score: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecommendation {
    pub city: String,
    #[serde(default)]
    pub recommended_hospitals: Vec<HospitalComparison>,
    pub best_hospital_id: i64,
    pub best_hospital_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PublicAlertSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityAlert {
    pub alert_type: String,
    pub message: String,
    pub severity: PublicAlertSeverity,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub hospital_id: i64,
    pub hospital_name: String,
    #[serde(default)]
    pub alerts: Vec<AvailabilityAlert>,
    #[serde(default)]
    pub alternate_hospitals: Vec<PublicHospitalInfo>,
}

// ── Helpers ──────────────────────────────────────────────────────────

fn nullable_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn snapshot_without_predictions_or_alerts_decodes_empty() {
        let snap: DashboardSnapshot = serde_json::from_value(json!({
            "hospital_id": 3,
            "hospital_name": "Max Super Speciality Hospital",
            "total_beds": 320,
            "current_occupied": 200,
            "current_utilization": 62.5
        }))
        .expect("minimal snapshot decodes");

        assert!(snap.predictions.is_empty());
        assert!(snap.alerts.is_empty());
        assert_eq!(snap.overall_status, OverallStatus::Green);
    }

    #[test]
    fn null_predicted_occupancy_becomes_non_finite() {
        let point: PredictionPoint = serde_json::from_value(json!({
            "date": "2025-01-02",
            "predicted_occupancy": null,
            "lower_bound": 10.0,
            "upper_bound": 20.0
        }))
        .expect("point decodes");
        assert!(!point.predicted_occupancy.is_finite());
        assert!((point.lower_bound - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn info_severity_is_an_alias_of_green() {
        let alert: Alert = serde_json::from_value(json!({
            "date": "2025-01-02",
            "severity": "info",
            "message": "normal load"
        }))
        .expect("alert decodes");
        assert_eq!(alert.severity, AlertSeverity::Green);
        assert_eq!(alert.key(), ("2025-01-02", AlertSeverity::Green));
    }
}
