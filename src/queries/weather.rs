//! Hourly weather from the archive and forecast endpoints.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::debug;

use super::{DateRange, DayFilter, WeatherSource};
use crate::config;
use crate::error::{ForecastError, Provider, Result};
use crate::models::WeatherRecord;
use crate::params::QueryParams;
use crate::session::{Location, Session};

// ---------------------------------------------------------------------------
// WeatherRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeatherMode {
    /// Observed weather over a date range, filtered by day.
    Historical {
        range: DateRange,
        day_filter: DayFilter,
    },
    /// Forecast for the next `horizon_days` days, starting today.
    Forecast { horizon_days: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRequest {
    pub location: Location,
    pub mode: WeatherMode,
}

impl WeatherRequest {
    /// Archive data for `range`, leaving out `today` (today's hours belong to
    /// the current-day request).
    pub fn historical(location: Location, range: DateRange, today: NaiveDate) -> Self {
        Self {
            location,
            mode: WeatherMode::Historical {
                range,
                day_filter: DayFilter::ExcludeDay(today),
            },
        }
    }

    /// Archive data for `today` only.
    pub fn current_day(location: Location, today: NaiveDate) -> Self {
        Self {
            location,
            mode: WeatherMode::Historical {
                range: DateRange::day(today),
                day_filter: DayFilter::OnlyDay(today),
            },
        }
    }

    pub fn forecast(location: Location, horizon_days: u8) -> Self {
        Self {
            location,
            mode: WeatherMode::Forecast { horizon_days },
        }
    }

    /// Replace the day filter of a historical request; forecasts are unaffected.
    pub fn with_day_filter(mut self, filter: DayFilter) -> Self {
        if let WeatherMode::Historical { day_filter, .. } = &mut self.mode {
            *day_filter = filter;
        }
        self
    }

    fn params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        params
            .param("latitude", self.location.latitude)
            .param("longitude", self.location.longitude);
        match self.mode {
            WeatherMode::Historical { range, .. } => {
                params
                    .date_span(range.start, range.end)
                    .param("hourly", config::hourly_fields_param());
            }
            WeatherMode::Forecast { horizon_days } => {
                if !(1..=config::MAX_FORECAST_DAYS).contains(&horizon_days) {
                    return Err(ForecastError::InvalidArgument(format!(
                        "Forecast horizon must be 1..={} days, got {}",
                        config::MAX_FORECAST_DAYS,
                        horizon_days
                    )));
                }
                params
                    .param("hourly", config::hourly_fields_param())
                    .param("forecast_days", horizon_days);
            }
        }
        Ok(params)
    }
}

// ---------------------------------------------------------------------------
// WeatherQuery
// ---------------------------------------------------------------------------

/// Query interface for the weather provider.
pub struct WeatherQuery<'a> {
    session: &'a Session,
}

impl<'a> WeatherQuery<'a> {
    /// Create a new `WeatherQuery` bound to the given session.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Fetch and normalize hourly weather for `request`.
    pub fn fetch(&self, request: &WeatherRequest) -> Result<Vec<WeatherRecord>> {
        let params = request.params()?;
        let url = match request.mode {
            WeatherMode::Historical { .. } => &self.session.endpoints.weather_archive,
            WeatherMode::Forecast { .. } => &self.session.endpoints.weather_forecast,
        };
        let body = self.session.get_json(Provider::Weather, url, &params)?;
        let mut records = parse_hourly(&body)?;

        if let WeatherMode::Historical { range, day_filter } = request.mode {
            records.retain(|r| range.contains(r.date) && day_filter.keeps(r.date));
        }
        Ok(records)
    }

    /// Forecast for the session location.
    pub fn forecast(&self, horizon_days: u8) -> Result<Vec<WeatherRecord>> {
        self.fetch(&WeatherRequest::forecast(self.session.location, horizon_days))
    }

    /// Observed weather for the session location over `range`, excluding today.
    pub fn historical(&self, range: DateRange) -> Result<Vec<WeatherRecord>> {
        self.fetch(&WeatherRequest::historical(
            self.session.location,
            range,
            self.session.today(),
        ))
    }

    /// Observed weather for the session location, today only.
    pub fn current_day(&self) -> Result<Vec<WeatherRecord>> {
        self.fetch(&WeatherRequest::current_day(
            self.session.location,
            self.session.today(),
        ))
    }
}

impl WeatherSource for WeatherQuery<'_> {
    fn fetch_weather(&self, request: &WeatherRequest) -> Result<Vec<WeatherRecord>> {
        self.fetch(request)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize an `hourly` response of parallel arrays into records.
///
/// Values are coerced to `f64` (numeric strings included). Any hour with a
/// missing or non-numeric measurement is dropped.
pub fn parse_hourly(body: &Value) -> Result<Vec<WeatherRecord>> {
    let hourly = body
        .get("hourly")
        .and_then(Value::as_object)
        .ok_or_else(|| ForecastError::malformed(Provider::Weather, "missing `hourly` object"))?;

    let times = hourly_column(hourly, "time")?;
    let columns = config::HOURLY_FIELDS
        .iter()
        .map(|field| {
            let col = hourly_column(hourly, field)?;
            if col.len() != times.len() {
                return Err(ForecastError::malformed(
                    Provider::Weather,
                    format!(
                        "`{}` has {} values for {} hours",
                        field,
                        col.len(),
                        times.len()
                    ),
                ));
            }
            Ok(col)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(times.len());
    let mut dropped = 0usize;
    'hours: for (i, time) in times.iter().enumerate() {
        let datetime = time
            .as_str()
            .and_then(parse_hour)
            .ok_or_else(|| {
                ForecastError::malformed(Provider::Weather, format!("bad time value {}", time))
            })?;

        let mut values = [0.0; 9];
        for (slot, col) in values.iter_mut().zip(&columns) {
            match coerce_f64(&col[i]) {
                Some(v) => *slot = v,
                None => {
                    dropped += 1;
                    continue 'hours;
                }
            }
        }
        records.push(WeatherRecord::from_measurements(datetime, values));
    }

    if dropped > 0 {
        debug!(dropped, kept = records.len(), "dropped incomplete weather hours");
    }
    Ok(records)
}

fn hourly_column<'v>(hourly: &'v Map<String, Value>, name: &str) -> Result<&'v Vec<Value>> {
    hourly
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ForecastError::malformed(Provider::Weather, format!("missing hourly column `{}`", name))
        })
}

/// Parse `YYYY-MM-DDTHH:MM`, with or without seconds.
pub(crate) fn parse_hour(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Coerce a JSON number or numeric string to a finite `f64`.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}
