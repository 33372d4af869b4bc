//! Electricity spot price forecasting for the Nordic day-ahead market.
//!
//! Fetches hourly weather (Open-Meteo) and spot prices (Energi Data Service),
//! joins the weather with a Danish holiday calendar into the feature rows a
//! pretrained regression model expects, runs the model through the
//! [`Predictor`] trait and shapes the result into a time-ordered forecast
//! table and a time-of-day × date matrix.
//!
//! # Quick start
//!
//! ```no_run
//! use elspot_forecast::{FeatureMatrix, ForecastSdk};
//!
//! let sdk = ForecastSdk::builder().build().unwrap();
//!
//! // Any closure over the feature matrix can stand in for the model.
//! let model = |m: &FeatureMatrix| -> elspot_forecast::Result<Vec<f64>> {
//!     Ok(vec![0.5; m.len()])
//! };
//! let forecast = sdk.forecast(&model, 5).unwrap();
//! println!("{}", forecast.to_matrix().unwrap());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod params;
pub mod pipeline;
pub mod queries;
pub mod session;

#[cfg(feature = "async")]
pub use async_client::AsyncForecastSdk;
pub use cache::CacheManager;
pub use error::{ForecastError, Provider, Result};
pub use models::{
    CalendarRecord, CalendarTable, FeatureMatrix, FeatureRow, FeatureTable, ForecastMatrix,
    ForecastRow, ForecastTable, LabeledFeatureTable, PriceArea, PriceRecord, PriceTable,
    RenewableForecastRecord, WeatherRecord, FEATURE_COLUMNS,
};
pub use params::QueryParams;
pub use pipeline::{assemble, assemble_with_prices, build_forecast, to_matrix, Predictor};
pub use queries::{
    DateRange, DayFilter, EndBound, PriceRequest, PriceSource, WeatherRequest, WeatherSource,
};
pub use session::{CalendarSource, Endpoints, Location, Session};

use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// ForecastSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ForecastSdk`] instance.
///
/// Use [`ForecastSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ForecastSdkBuilder::build) to create the SDK.
pub struct ForecastSdkBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    latitude: f64,
    longitude: f64,
    endpoints: Endpoints,
    memoize: bool,
    calendar_source: CalendarSource,
    reference_date: Option<NaiveDate>,
}

impl Default for ForecastSdkBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(120),
            latitude: config::DEFAULT_LATITUDE,
            longitude: config::DEFAULT_LONGITUDE,
            endpoints: Endpoints::default(),
            memoize: true,
            calendar_source: CalendarSource::Bundled,
            reference_date: None,
        }
    }
}

impl ForecastSdkBuilder {
    /// Set the weather location. Defaults to Aalborg (57.048, 9.9187).
    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Set a custom cache directory for the remote holiday reference file.
    ///
    /// If not set, the platform cache directory is used
    /// (e.g. `~/.cache/elspot-forecast` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, no request leaves the process; only memoized responses
    /// and previously cached reference files are used. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override provider endpoints.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Reuse identical provider responses within the session. Defaults to `true`.
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Choose where the holiday reference table is read from.
    pub fn calendar_source(mut self, source: CalendarSource) -> Self {
        self.calendar_source = source;
        self
    }

    /// Pin the date treated as "today" by current-day and historical filters.
    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Build the SDK. Performs no I/O.
    pub fn build(self) -> Result<ForecastSdk> {
        let location = Location::new(self.latitude, self.longitude)?;
        let cache = CacheManager::new(self.cache_dir, self.offline, self.timeout);
        let session = Session::new(cache, self.endpoints, location)
            .with_calendar_source(self.calendar_source)
            .with_reference_date(self.reference_date)
            .with_memoize(self.memoize);
        Ok(ForecastSdk { session })
    }
}

// ---------------------------------------------------------------------------
// ForecastSdk
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns a [`Session`] and exposes provider query interfaces as lightweight
/// borrowing wrappers, plus the end-to-end forecast pipeline.
///
/// Created via [`ForecastSdk::builder()`].
pub struct ForecastSdk {
    session: Session,
}

impl ForecastSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> ForecastSdkBuilder {
        ForecastSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the weather query interface.
    pub fn weather(&self) -> queries::WeatherQuery<'_> {
        queries::WeatherQuery::new(&self.session)
    }

    /// Access the spot price and renewable forecast query interface.
    pub fn prices(&self) -> queries::PriceQuery<'_> {
        queries::PriceQuery::new(&self.session)
    }

    /// Access the calendar built from the configured holiday reference.
    pub fn calendar(&self) -> queries::CalendarQuery<'_> {
        queries::CalendarQuery::new(&self.session)
    }

    // -- Pipeline ----------------------------------------------------------

    /// Forecast prices for the next `horizon_days` days at the configured
    /// location.
    pub fn forecast<P: Predictor + ?Sized>(
        &self,
        predictor: &P,
        horizon_days: u8,
    ) -> Result<ForecastTable> {
        let request = WeatherRequest::forecast(self.session.location, horizon_days);
        self.forecast_with(&request, predictor)
    }

    /// Forecast prices for an arbitrary weather request.
    pub fn forecast_with<P: Predictor + ?Sized>(
        &self,
        request: &WeatherRequest,
        predictor: &P,
    ) -> Result<ForecastTable> {
        let calendar = self.calendar().table()?;
        pipeline::forecast_prices(&self.weather(), calendar, request, predictor)
    }

    /// Historical features labeled with `area`'s realized price over `range`.
    pub fn labeled_features(&self, range: DateRange, area: PriceArea) -> Result<LabeledFeatureTable> {
        let weather = self.weather().historical(range)?;
        let prices = self.prices().historical(&[area], range)?;
        let calendar = self.calendar().table()?;
        Ok(assemble_with_prices(&weather, calendar, &prices, area))
    }

    // -- Session management ------------------------------------------------

    /// Forget memoized provider responses and the built calendar.
    pub fn clear_memo(&mut self) {
        self.session.clear_memo();
    }

    /// Delete the cached holiday reference file so it is downloaded again.
    ///
    /// Other files in the cache directory are left alone.
    pub fn refresh_reference(&mut self) -> Result<()> {
        self.session.cache.borrow().clear()?;
        self.session.clear_memo();
        Ok(())
    }

    /// Return a reference to the underlying [`Session`].
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Consume the SDK and release the HTTP client.
    pub fn close(self) {
        self.session.cache.borrow_mut().close();
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ForecastSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.session.cache.borrow();
        write!(
            f,
            "ForecastSdk(location=({}, {}), memoized={}, offline={})",
            self.session.location.latitude,
            self.session.location.longitude,
            self.session.memo_len(),
            cache.offline
        )
    }
}
