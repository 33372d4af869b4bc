//! Request execution with per-session memoization.
//!
//! A [`Session`] owns the [`CacheManager`] (and through it the HTTP client),
//! the provider endpoints and the default location. Identical requests made
//! during one session are answered from memory.

use crate::cache::CacheManager;
use crate::config;
use crate::error::{ForecastError, Provider, Result};
use crate::models::CalendarTable;
use crate::params::QueryParams;
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Base URLs of the external providers.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub weather_archive: String,
    pub weather_forecast: String,
    /// Energy data service base; datasets are appended as path segments.
    pub energy_data: String,
    pub calendar_reference: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_archive: config::WEATHER_ARCHIVE_URL.to_string(),
            weather_forecast: config::WEATHER_FORECAST_URL.to_string(),
            energy_data: config::ENERGY_DATA_BASE.to_string(),
            calendar_reference: config::CALENDAR_REFERENCE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every provider at one base URL (used against mock servers).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            weather_archive: format!("{}/v1/archive", base),
            weather_forecast: format!("{}/v1/forecast", base),
            energy_data: format!("{}/dataset", base),
            calendar_reference: format!("{}/{}", base, config::CALENDAR_REFERENCE_FILE),
        }
    }

    pub fn dataset(&self, name: &str) -> String {
        format!("{}/{}", self.energy_data.trim_end_matches('/'), name)
    }
}

/// Weather location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidArgument(format!(
                "Invalid coordinates: ({}, {})",
                latitude, longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: config::DEFAULT_LATITUDE,
            longitude: config::DEFAULT_LONGITUDE,
        }
    }
}

/// Where the holiday reference table comes from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CalendarSource {
    /// The table compiled into the crate.
    #[default]
    Bundled,
    /// A local `date;type` file.
    File(PathBuf),
    /// The remote reference copy, cached on disk after the first download.
    Remote,
}

pub struct Session {
    /// The cache manager holding the HTTP client and reference files.
    pub cache: RefCell<CacheManager>,
    pub endpoints: Endpoints,
    pub location: Location,
    pub calendar_source: CalendarSource,
    reference_date: Option<NaiveDate>,
    memoize: bool,
    memo: RefCell<HashMap<String, Value>>,
    pub(crate) calendar: OnceCell<CalendarTable>,
}

impl Session {
    pub fn new(cache: CacheManager, endpoints: Endpoints, location: Location) -> Self {
        Self {
            cache: RefCell::new(cache),
            endpoints,
            location,
            calendar_source: CalendarSource::Bundled,
            reference_date: None,
            memoize: true,
            memo: RefCell::new(HashMap::new()),
            calendar: OnceCell::new(),
        }
    }

    pub fn with_calendar_source(mut self, source: CalendarSource) -> Self {
        self.calendar_source = source;
        self
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_reference_date(mut self, date: Option<NaiveDate>) -> Self {
        self.reference_date = date;
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// The date treated as "today" by day filters.
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// GET `url` with `params` and parse the body as JSON.
    ///
    /// Transport failures and non-success statuses become
    /// [`ForecastError::Fetch`]; an unparseable body becomes
    /// [`ForecastError::MalformedResponse`]. Both name `provider`.
    pub fn get_json(&self, provider: Provider, url: &str, params: &QueryParams) -> Result<Value> {
        let key = params.cache_key(url);
        if self.memoize {
            if let Some(hit) = self.memo.borrow().get(&key) {
                debug!(%provider, key = %key, "memoized response");
                return Ok(hit.clone());
            }
        }

        if self.cache.borrow().offline {
            return Err(ForecastError::NotFound(format!(
                "Cannot reach {} while offline mode is enabled",
                provider
            )));
        }

        let client = self.cache.borrow_mut().client()?.clone();
        info!(%provider, url, "requesting");
        let fetch_err = |source: reqwest::Error| ForecastError::Fetch { provider, source };
        let resp = client
            .get(url)
            .query(&params.build())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let body = resp.text().map_err(fetch_err)?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ForecastError::malformed(provider, format!("invalid JSON: {}", e)))?;

        if self.memoize {
            self.memo.borrow_mut().insert(key, value.clone());
        }
        Ok(value)
    }

    /// Number of memoized responses.
    pub fn memo_len(&self) -> usize {
        self.memo.borrow().len()
    }

    /// Forget memoized responses and the built calendar.
    pub fn clear_memo(&mut self) {
        self.memo.borrow_mut().clear();
        self.calendar = OnceCell::new();
    }
}
