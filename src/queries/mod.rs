//! Provider query modules.
//!
//! Each module provides a query struct that borrows the [`Session`](crate::session::Session)
//! and normalizes one provider's responses into typed records. The
//! [`WeatherSource`] and [`PriceSource`] traits are the seams the pipeline
//! depends on, so callers can substitute their own data.

pub mod calendar;
pub mod prices;
pub mod weather;

pub use calendar::CalendarQuery;
pub use prices::{PriceMode, PriceQuery, PriceRequest};
pub use weather::{WeatherMode, WeatherQuery, WeatherRequest};

use chrono::NaiveDate;

use crate::error::{ForecastError, Result};
use crate::models::{PriceTable, RenewableForecastRecord, WeatherRecord};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can produce hourly weather for a request.
pub trait WeatherSource {
    fn fetch_weather(&self, request: &WeatherRequest) -> Result<Vec<WeatherRecord>>;
}

/// Anything that can produce spot prices (and renewable forecasts) for a request.
pub trait PriceSource {
    fn fetch_prices(&self, request: &PriceRequest) -> Result<PriceTable>;

    fn fetch_renewable_forecast(
        &self,
        request: &PriceRequest,
    ) -> Result<Vec<RenewableForecastRecord>>;
}

// ---------------------------------------------------------------------------
// Date windows and filters
// ---------------------------------------------------------------------------

/// Whether the last date of a [`DateRange`] is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndBound {
    #[default]
    Inclusive,
    Exclusive,
}

/// Calendar-day window requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub end_bound: EndBound,
}

impl DateRange {
    /// Inclusive range. Fails if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ForecastError::InvalidArgument(format!(
                "Date range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self {
            start,
            end,
            end_bound: EndBound::Inclusive,
        })
    }

    /// A single day.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
            end_bound: EndBound::Inclusive,
        }
    }

    pub fn with_end_bound(mut self, end_bound: EndBound) -> Self {
        self.end_bound = end_bound;
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.end_bound {
            EndBound::Inclusive => date >= self.start && date <= self.end,
            EndBound::Exclusive => date >= self.start && date < self.end,
        }
    }
}

/// Row filter relative to a reference day, applied after fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    /// Keep every row.
    All,
    /// Keep only rows dated on the given day.
    OnlyDay(NaiveDate),
    /// Drop rows dated on the given day.
    ExcludeDay(NaiveDate),
}

impl DayFilter {
    pub fn keeps(&self, date: NaiveDate) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::OnlyDay(day) => date == *day,
            DayFilter::ExcludeDay(day) => date != *day,
        }
    }
}
