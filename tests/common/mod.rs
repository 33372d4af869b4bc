//! Shared fixtures for the integration tests.
//!
//! Provides synthetic weather hours, a small calendar, provider JSON bodies in
//! the shape the real APIs return, and an SDK pointed at a mock server.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use elspot_forecast::{
    CalendarRecord, CalendarTable, Endpoints, ForecastSdk, WeatherRecord,
};
use serde_json::{json, Value};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).unwrap()
}

/// Reference date used by every SDK built here (a Wednesday).
pub fn today() -> NaiveDate {
    ymd(2024, 3, 6)
}

// -- Weather -----------------------------------------------------------------

/// `hours` consecutive weather records starting at midnight of `start`.
///
/// Temperature encodes the hour index so rows are distinguishable.
pub fn weather_hours(start: NaiveDate, hours: usize) -> Vec<WeatherRecord> {
    (0..hours)
        .map(|i| {
            let dt = at(start, 0) + Duration::hours(i as i64);
            WeatherRecord::from_measurements(
                dt,
                [i as f64, 80.0, 0.0, 0.0, 0.0, 3.0, 90.0, 5.5, 9.0],
            )
        })
        .collect()
}

/// Open-Meteo style `hourly` body for consecutive hours starting at `start`.
pub fn hourly_body(start: NaiveDate, hours: usize) -> Value {
    let times: Vec<String> = (0..hours)
        .map(|i| {
            (at(start, 0) + Duration::hours(i as i64))
                .format("%Y-%m-%dT%H:%M")
                .to_string()
        })
        .collect();
    let temps: Vec<f64> = (0..hours).map(|i| i as f64 / 2.0).collect();
    json!({
        "latitude": 57.04,
        "longitude": 9.92,
        "hourly": {
            "time": times,
            "temperature_2m": temps,
            "relative_humidity_2m": vec![81; hours],
            "precipitation": vec![0.0; hours],
            "rain": vec![0.0; hours],
            "snowfall": vec![0.0; hours],
            "weather_code": vec![3; hours],
            "cloud_cover": vec![100; hours],
            "wind_speed_10m": vec![12.4; hours],
            "wind_gusts_10m": vec![25.2; hours],
        }
    })
}

// -- Calendar ----------------------------------------------------------------

/// Five reference rows: three workdays and two holidays.
pub const CALENDAR_CSV: &str = "date;type\n\
04/03/2024;Workday\n\
05/03/2024;Workday\n\
06/03/2024;Workday\n\
09/03/2024;Not a Workday\n\
10/03/2024;Not a Workday\n";

/// Calendar covering every day from `start` for `days` days, all workdays.
pub fn calendar_days(start: NaiveDate, days: i64) -> CalendarTable {
    CalendarTable::from_records(
        (0..days).map(|i| CalendarRecord::new(start + Duration::days(i), "Workday")),
    )
}

// -- Prices ------------------------------------------------------------------

/// One `Elspotprices` record.
pub fn spot_record(hour_dk: &str, hour_utc: &str, area: &str, mwh: Option<f64>) -> Value {
    json!({
        "HourUTC": hour_utc,
        "HourDK": hour_dk,
        "PriceArea": area,
        "SpotPriceDKK": mwh,
        "SpotPriceEUR": mwh.map(|p| p / 7.45),
    })
}

/// `Elspotprices` body with DK1 and DK2 for every hour of `date`, newest first.
///
/// DK1 costs `100 * hour` DKK/MWh, DK2 `100 * hour + 50`.
pub fn spot_body_for_day(date: NaiveDate) -> Value {
    let mut records = Vec::new();
    for hour in (0..24).rev() {
        let local = at(date, hour);
        let utc = local - Duration::hours(1);
        let dk = local.format("%Y-%m-%dT%H:%M:%S").to_string();
        let u = utc.format("%Y-%m-%dT%H:%M:%S").to_string();
        records.push(spot_record(&dk, &u, "DK2", Some(100.0 * hour as f64 + 50.0)));
        records.push(spot_record(&dk, &u, "DK1", Some(100.0 * hour as f64)));
    }
    json!({ "total": records.len(), "records": records })
}

// -- SDK -----------------------------------------------------------------------

/// SDK with every endpoint on `base_url` and "today" pinned to [`today`].
pub fn sdk_for(base_url: &str) -> ForecastSdk {
    ForecastSdk::builder()
        .endpoints(Endpoints::with_base(base_url))
        .reference_date(today())
        .build()
        .unwrap()
}
