use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ForecastError;

// ---------------------------------------------------------------------------
// PriceArea — Bidding zone served by the price provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceArea {
    Dk1,
    Dk2,
    Se3,
    Se4,
    No2,
    De,
    System,
}

impl PriceArea {
    pub const ALL: [PriceArea; 7] = [
        PriceArea::Dk1,
        PriceArea::Dk2,
        PriceArea::Se3,
        PriceArea::Se4,
        PriceArea::No2,
        PriceArea::De,
        PriceArea::System,
    ];

    /// Provider code, e.g. `"DK1"`.
    pub fn code(&self) -> &'static str {
        match self {
            PriceArea::Dk1 => "DK1",
            PriceArea::Dk2 => "DK2",
            PriceArea::Se3 => "SE3",
            PriceArea::Se4 => "SE4",
            PriceArea::No2 => "NO2",
            PriceArea::De => "DE",
            PriceArea::System => "SYSTEM",
        }
    }

    /// Name of this area's price column in the pivoted table,
    /// e.g. `dk1_spotpricedkk_kwh`.
    pub fn price_column(&self) -> String {
        format!("{}_spotpricedkk_kwh", self.code().to_lowercase())
    }
}

impl fmt::Display for PriceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PriceArea {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        PriceArea::ALL
            .iter()
            .copied()
            .find(|a| a.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ForecastError::InvalidArgument(format!("Unknown price area: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// PriceRecord — One hourly spot price for one area
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Epoch milliseconds of the UTC delivery hour.
    pub timestamp: i64,
    /// Local (Danish) delivery hour.
    pub datetime: NaiveDateTime,
    pub date: NaiveDate,
    pub hour: u32,
    pub price_area: PriceArea,
    /// Spot price per kWh.
    pub spot_price: f64,
}

// ---------------------------------------------------------------------------
// PriceTable — Spot prices pivoted to one column per area
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub timestamp: i64,
    pub datetime: NaiveDateTime,
    pub date: NaiveDate,
    pub hour: u32,
    /// Per-kWh price keyed by area. An area missing for this hour is absent.
    pub prices: BTreeMap<PriceArea, f64>,
}

impl PriceRow {
    pub fn price(&self, area: PriceArea) -> Option<f64> {
        self.prices.get(&area).copied()
    }
}

/// Wide price table, sorted ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceTable {
    pub areas: Vec<PriceArea>,
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Pivot per-area records into one row per timestamp.
    ///
    /// Returns an error naming the offending key if an (area, timestamp) pair
    /// occurs twice.
    pub fn pivot(areas: &[PriceArea], records: Vec<PriceRecord>) -> crate::Result<Self> {
        let mut by_time: BTreeMap<i64, PriceRow> = BTreeMap::new();
        for rec in records {
            let row = by_time.entry(rec.timestamp).or_insert_with(|| PriceRow {
                timestamp: rec.timestamp,
                datetime: rec.datetime,
                date: rec.date,
                hour: rec.hour,
                prices: BTreeMap::new(),
            });
            if row.prices.insert(rec.price_area, rec.spot_price).is_some() {
                return Err(ForecastError::malformed(
                    crate::error::Provider::Prices,
                    format!(
                        "duplicate price for {} at {}",
                        rec.price_area,
                        rec.datetime.format("%Y-%m-%dT%H:%M")
                    ),
                ));
            }
        }

        let mut areas = areas.to_vec();
        areas.sort();
        areas.dedup();
        Ok(Self {
            areas,
            rows: by_time.into_values().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in output order: identifiers, then one price column per area.
    pub fn column_names(&self) -> Vec<String> {
        let mut cols = vec![
            "timestamp".to_string(),
            "date".to_string(),
            "hour".to_string(),
        ];
        cols.extend(self.areas.iter().map(|a| a.price_column()));
        cols
    }

    /// Row at the given epoch-millisecond timestamp.
    pub fn at(&self, timestamp: i64) -> Option<&PriceRow> {
        self.rows
            .binary_search_by_key(&timestamp, |r| r.timestamp)
            .ok()
            .map(|i| &self.rows[i])
    }
}

// ---------------------------------------------------------------------------
// RenewableForecastRecord — Forecasted generation for one area and source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewableForecastRecord {
    pub timestamp: i64,
    pub datetime: NaiveDateTime,
    pub date: NaiveDate,
    pub hour: u32,
    pub price_area: PriceArea,
    /// Generation type, e.g. `"Solar"` or `"Offshore Wind"`.
    pub forecast_type: String,
    pub forecast_day_ahead: Option<f64>,
    pub forecast_intraday: Option<f64>,
    pub forecast_current: Option<f64>,
}
