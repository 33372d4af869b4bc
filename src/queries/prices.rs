//! Spot prices and renewable generation forecasts from the energy data service.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::{Map, Value};
use tracing::debug;

use super::weather::{coerce_f64, parse_hour};
use super::{DateRange, DayFilter, PriceSource};
use crate::config;
use crate::error::{ForecastError, Provider, Result};
use crate::models::{PriceArea, PriceRecord, PriceTable, RenewableForecastRecord};
use crate::params::QueryParams;
use crate::session::Session;

/// Provider prices are per MWh.
pub const KWH_PER_MWH: f64 = 1000.0;

// ---------------------------------------------------------------------------
// PriceRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceMode {
    Historical,
    Current,
}

/// Areas, date window and day filter for a price or renewable query.
///
/// Without an explicit `day_filter` the mode decides: historical requests keep
/// every row in the range, current requests keep only the range's first day.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest {
    pub mode: PriceMode,
    pub areas: Vec<PriceArea>,
    pub range: DateRange,
    pub day_filter: Option<DayFilter>,
}

impl PriceRequest {
    /// Every row in `range`.
    pub fn historical(areas: &[PriceArea], range: DateRange) -> Self {
        Self {
            mode: PriceMode::Historical,
            areas: areas.to_vec(),
            range,
            day_filter: None,
        }
    }

    /// Rows dated `today` only.
    pub fn current(areas: &[PriceArea], today: NaiveDate) -> Self {
        Self {
            mode: PriceMode::Current,
            areas: areas.to_vec(),
            range: DateRange::day(today),
            day_filter: None,
        }
    }

    /// Override the mode's default filter.
    pub fn with_day_filter(mut self, filter: DayFilter) -> Self {
        self.day_filter = Some(filter);
        self
    }

    /// The filter applied after fetching.
    pub fn effective_filter(&self) -> DayFilter {
        match (self.day_filter, self.mode) {
            (Some(filter), _) => filter,
            (None, PriceMode::Historical) => DayFilter::All,
            (None, PriceMode::Current) => DayFilter::OnlyDay(self.range.start),
        }
    }

    fn keeps(&self, date: NaiveDate) -> bool {
        self.range.contains(date) && self.effective_filter().keeps(date)
    }

    fn validate(&self) -> Result<()> {
        if self.areas.is_empty() {
            return Err(ForecastError::InvalidArgument(
                "At least one price area is required".into(),
            ));
        }
        Ok(())
    }

    /// `{"PriceArea":["DK1","DK2"]}`
    fn area_filter(&self) -> String {
        serde_json::json!({ "PriceArea": self.areas }).to_string()
    }
}

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for the energy data service.
pub struct PriceQuery<'a> {
    session: &'a Session,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given session.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Fetch spot prices and pivot them to one column per area.
    pub fn fetch(&self, request: &PriceRequest) -> Result<PriceTable> {
        request.validate()?;

        let mut params = QueryParams::new();
        params
            .param("offset", 0)
            .day_window(request.range.start, request.range.end)
            .param("filter", request.area_filter())
            .param("sort", "HourUTC DESC");

        let url = self.session.endpoints.dataset(config::SPOT_PRICE_DATASET);
        let body = self.session.get_json(Provider::Prices, &url, &params)?;
        let mut records = parse_spot_prices(&body, &request.areas)?;
        records.retain(|r| request.keeps(r.date));
        PriceTable::pivot(&request.areas, records)
    }

    /// Fetch hourly renewable generation forecasts.
    pub fn renewable_forecast(&self, request: &PriceRequest) -> Result<Vec<RenewableForecastRecord>> {
        request.validate()?;

        let mut params = QueryParams::new();
        params
            .param("offset", 0)
            .day_window(request.range.start, request.range.end);

        let url = self
            .session
            .endpoints
            .dataset(config::RENEWABLE_FORECAST_DATASET);
        let body = self.session.get_json(Provider::Prices, &url, &params)?;
        let mut records = parse_renewable_forecasts(&body, &request.areas)?;
        records.retain(|r| request.keeps(r.date));
        records.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then(a.price_area.cmp(&b.price_area))
        });
        Ok(records)
    }

    /// Today's prices for `areas`.
    pub fn current(&self, areas: &[PriceArea]) -> Result<PriceTable> {
        self.fetch(&PriceRequest::current(areas, self.session.today()))
    }

    /// Prices for `areas` over `range`.
    pub fn historical(&self, areas: &[PriceArea], range: DateRange) -> Result<PriceTable> {
        self.fetch(&PriceRequest::historical(areas, range))
    }
}

impl PriceSource for PriceQuery<'_> {
    fn fetch_prices(&self, request: &PriceRequest) -> Result<PriceTable> {
        self.fetch(request)
    }

    fn fetch_renewable_forecast(
        &self,
        request: &PriceRequest,
    ) -> Result<Vec<RenewableForecastRecord>> {
        self.renewable_forecast(request)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Hour keys shared by both datasets.
struct HourKey {
    timestamp: i64,
    datetime: NaiveDateTime,
    area: PriceArea,
}

/// Read `HourDK`, optional `HourUTC` and `PriceArea` from one record.
///
/// Returns `Ok(None)` for areas outside `areas`. The timestamp is taken from
/// `HourUTC` when present so that the repeated local hour at the end of
/// daylight saving time keeps a distinct key.
fn hour_key(record: &Map<String, Value>, areas: &[PriceArea]) -> Result<Option<HourKey>> {
    let area_code = str_field(record, "PriceArea")?;
    let area = match area_code.parse::<PriceArea>() {
        Ok(a) if areas.contains(&a) => a,
        _ => return Ok(None),
    };

    let local = str_field(record, "HourDK")?;
    let datetime = parse_hour(local).ok_or_else(|| {
        ForecastError::malformed(Provider::Prices, format!("bad HourDK value {}", local))
    })?;
    let utc = match record.get("HourUTC").and_then(Value::as_str) {
        Some(s) => parse_hour(s).ok_or_else(|| {
            ForecastError::malformed(Provider::Prices, format!("bad HourUTC value {}", s))
        })?,
        None => datetime,
    };

    Ok(Some(HourKey {
        timestamp: utc.and_utc().timestamp_millis(),
        datetime,
        area,
    }))
}

fn records(body: &Value) -> Result<&Vec<Value>> {
    body.get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| ForecastError::malformed(Provider::Prices, "missing `records` array"))
}

fn as_record(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ForecastError::malformed(Provider::Prices, "record is not an object"))
}

fn str_field<'v>(record: &'v Map<String, Value>, name: &str) -> Result<&'v str> {
    record
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ForecastError::malformed(Provider::Prices, format!("record without `{}`", name)))
}

/// Normalize `Elspotprices` records, converting DKK/MWh to DKK/kWh.
///
/// Records for other areas and records without a price are skipped.
pub fn parse_spot_prices(body: &Value, areas: &[PriceArea]) -> Result<Vec<PriceRecord>> {
    let mut out = Vec::new();
    let mut unpriced = 0usize;
    for value in records(body)? {
        let record = as_record(value)?;
        let Some(key) = hour_key(record, areas)? else {
            continue;
        };
        let Some(mwh) = record.get("SpotPriceDKK").and_then(coerce_f64) else {
            unpriced += 1;
            continue;
        };
        out.push(PriceRecord {
            timestamp: key.timestamp,
            datetime: key.datetime,
            date: key.datetime.date(),
            hour: key.datetime.hour(),
            price_area: key.area,
            spot_price: mwh / KWH_PER_MWH,
        });
    }
    if unpriced > 0 {
        debug!(unpriced, "skipped price records without SpotPriceDKK");
    }
    Ok(out)
}

/// Normalize `Forecasts_Hour` records for `areas`.
pub fn parse_renewable_forecasts(
    body: &Value,
    areas: &[PriceArea],
) -> Result<Vec<RenewableForecastRecord>> {
    let mut out = Vec::new();
    for value in records(body)? {
        let record = as_record(value)?;
        let Some(key) = hour_key(record, areas)? else {
            continue;
        };
        out.push(RenewableForecastRecord {
            timestamp: key.timestamp,
            datetime: key.datetime,
            date: key.datetime.date(),
            hour: key.datetime.hour(),
            price_area: key.area,
            forecast_type: str_field(record, "ForecastType")?.to_string(),
            forecast_day_ahead: record.get("ForecastDayAhead").and_then(coerce_f64),
            forecast_intraday: record.get("ForecastIntraday").and_then(coerce_f64),
            forecast_current: record.get("ForecastCurrent").and_then(coerce_f64),
        });
    }
    Ok(out)
}
