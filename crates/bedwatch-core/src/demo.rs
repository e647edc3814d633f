// ── Demo data ──
//
// Fixed fallback values the views substitute when the backend has nothing
// to show or cannot be reached. Values are chosen only by hospital id.

use bedwatch_api::{DashboardSnapshot, EhrRecord, Hospital, OverallStatus, PredictionPoint};
use chrono::{Days, NaiveDate};

/// Hospital id that gets the "busier" demo forecast.
pub const DEMO_SENTINEL_ID: i64 = 1;

const SENTINEL_SERIES: [f64; 7] = [182.0, 188.0, 195.0, 201.0, 198.0, 190.0, 185.0];
const DEFAULT_SERIES: [f64; 7] = [128.0, 132.0, 137.0, 141.0, 139.0, 134.0, 130.0];
const BOUND_MARGIN: f64 = 8.0;

/// `(occupied, admissions, discharges, icu, emergency)`, oldest day first.
const EHR_DAYS: [(i64, i64, i64, i64, i64); 7] = [
    (168, 24, 21, 16, 7),
    (171, 26, 23, 17, 8),
    (174, 25, 22, 18, 6),
    (177, 28, 25, 18, 9),
    (176, 22, 23, 17, 5),
    (173, 21, 24, 17, 6),
    (175, 27, 25, 18, 8),
];

/// The two hospitals shown when the hospital list cannot be fetched.
pub fn demo_hospitals() -> Vec<Hospital> {
    vec![
        demo_hospital(1, "Apollo Hospitals", "Mumbai, Maharashtra", 250, 30),
        demo_hospital(2, "Fortis Healthcare", "Delhi, NCR", 180, 25),
    ]
}

fn demo_hospital(id: i64, name: &str, location: &str, total_beds: i64, icu_beds: i64) -> Hospital {
    Hospital {
        id,
        hospital_name: name.into(),
        location: location.into(),
        total_beds,
        icu_beds,
        api_endpoint: None,
        sync_enabled: None,
        last_sync: None,
    }
}

/// Seven daily points starting the day after `today`.
pub fn demo_predictions(hospital_id: i64, today: NaiveDate) -> Vec<PredictionPoint> {
    let series = if hospital_id == DEMO_SENTINEL_ID {
        &SENTINEL_SERIES
    } else {
        &DEFAULT_SERIES
    };

    (1u64..)
        .zip(series)
        .map(|(offset, &value)| PredictionPoint {
            date: today
                .checked_add_days(Days::new(offset))
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string(),
            predicted_occupancy: value,
            lower_bound: value - BOUND_MARGIN,
            upper_bound: value + BOUND_MARGIN,
        })
        .collect()
}

/// Stand-in dashboard for a hospital whose snapshot could not be fetched.
pub fn demo_snapshot(hospital_id: i64, today: NaiveDate) -> DashboardSnapshot {
    let known = demo_hospitals().into_iter().find(|h| h.id == hospital_id);
    let (hospital_name, location) = known.map_or_else(
        || ("Demo Hospital".to_owned(), "Demo City".to_owned()),
        |h| (h.hospital_name, h.location),
    );

    DashboardSnapshot {
        hospital_id,
        hospital_name,
        location,
        total_beds: 250,
        icu_beds: 30,
        current_occupied: 175,
        current_icu_occupied: 18,
        current_utilization: 70.0,
        historical_data: Vec::new(),
        predictions: demo_predictions(hospital_id, today),
        alerts: Vec::new(),
        overall_status: OverallStatus::Green,
    }
}

/// Seven daily records ending on `today`, oldest first. Ids count from 1.
pub fn demo_ehr_records(hospital_id: i64, today: NaiveDate) -> Vec<EhrRecord> {
    let first = today.checked_sub_days(Days::new(6)).unwrap_or(today);

    (0u64..)
        .zip(1i64..)
        .zip(EHR_DAYS)
        .map(|((offset, id), (occupied, admissions, discharges, icu, emergency))| EhrRecord {
            id,
            hospital_id,
            date: first
                .checked_add_days(Days::new(offset))
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string(),
            occupied_beds: occupied,
            admissions,
            discharges,
            icu_occupied: icu,
            emergency_cases: emergency,
        })
        .collect()
}
