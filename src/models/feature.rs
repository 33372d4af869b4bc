use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::calendar::CalendarRecord;
use super::price::PriceArea;
use super::weather::WeatherRecord;
use crate::error::{ForecastError, Result};

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 15;

/// Model input columns, in the order the model was trained on.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "hour",
    "temperature_2m",
    "relative_humidity_2m",
    "precipitation",
    "rain",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "wind_speed_10m",
    "wind_gusts_10m",
    "dayofweek",
    "day",
    "month",
    "year",
    "workday",
];

/// Check a declared column list against [`FEATURE_COLUMNS`], order included.
pub fn validate_schema<S: AsRef<str>>(expected: &[S]) -> Result<()> {
    let matches = expected.len() == FEATURE_COUNT
        && expected
            .iter()
            .zip(FEATURE_COLUMNS.iter())
            .all(|(e, c)| e.as_ref() == *c);
    if matches {
        return Ok(());
    }
    Err(ForecastError::SchemaMismatch {
        expected: expected
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        actual: FEATURE_COLUMNS.join(", "),
    })
}

// ---------------------------------------------------------------------------
// FeatureRow — One hour of model input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub hour: u32,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub snowfall: f64,
    pub weather_code: f64,
    pub cloud_cover: f64,
    pub wind_speed_10m: f64,
    pub wind_gusts_10m: f64,
    pub dayofweek: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub workday: bool,
}

impl FeatureRow {
    pub fn new(weather: &WeatherRecord, calendar: &CalendarRecord) -> Self {
        Self {
            hour: weather.hour,
            temperature_2m: weather.temperature_2m,
            relative_humidity_2m: weather.relative_humidity_2m,
            precipitation: weather.precipitation,
            rain: weather.rain,
            snowfall: weather.snowfall,
            weather_code: weather.weather_code,
            cloud_cover: weather.cloud_cover,
            wind_speed_10m: weather.wind_speed_10m,
            wind_gusts_10m: weather.wind_gusts_10m,
            dayofweek: calendar.day_of_week,
            day: calendar.day,
            month: calendar.month,
            year: calendar.year,
            workday: calendar.is_workday,
        }
    }

    /// Values in [`FEATURE_COLUMNS`] order.
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.hour),
            self.temperature_2m,
            self.relative_humidity_2m,
            self.precipitation,
            self.rain,
            self.snowfall,
            self.weather_code,
            self.cloud_cover,
            self.wind_speed_10m,
            self.wind_gusts_10m,
            f64::from(self.dayofweek),
            f64::from(self.day),
            f64::from(self.month),
            f64::from(self.year),
            if self.workday { 1.0 } else { 0.0 },
        ]
    }
}

// ---------------------------------------------------------------------------
// FeatureMatrix — Dense model input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FeatureMatrix {
    pub fn from_rows(rows: &[FeatureRow]) -> Self {
        Self {
            rows: rows.iter().map(FeatureRow::to_vector).collect(),
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }

    pub fn rows(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.rows
    }

    /// All values of one named column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = FEATURE_COLUMNS.iter().position(|c| *c == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FeatureTable — Feature rows with their time identifiers
// ---------------------------------------------------------------------------

/// Feature rows paired index-for-index with the hour they describe.
///
/// Only the assembler appends to a table, so `identifiers[i]` always belongs
/// to `rows[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    identifiers: Vec<NaiveDateTime>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub(crate) fn push(&mut self, time: NaiveDateTime, row: FeatureRow) {
        self.identifiers.push(time);
        self.rows.push(row);
    }

    pub fn identifiers(&self) -> &[NaiveDateTime] {
        &self.identifiers
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn matrix(&self) -> FeatureMatrix {
        FeatureMatrix::from_rows(&self.rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Feature table with the realized spot price of one area per row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledFeatureTable {
    pub area: PriceArea,
    pub features: FeatureTable,
    /// Per-kWh price, index-aligned with `features`.
    pub targets: Vec<f64>,
}

impl LabeledFeatureTable {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Name of the target column, e.g. `dk1_spotpricedkk_kwh`.
    pub fn target_column(&self) -> String {
        self.area.price_column()
    }
}
