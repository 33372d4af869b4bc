//! Async wrapper around [`ForecastSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! provider requests are in flight.
//!
//! # Example
//!
//! ```no_run
//! use elspot_forecast::{AsyncForecastSdk, FeatureMatrix};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncForecastSdk::builder().build().await.unwrap();
//!
//!     let model = |m: &FeatureMatrix| -> elspot_forecast::Result<Vec<f64>> {
//!         Ok(vec![0.0; m.len()])
//!     };
//!     let forecast = sdk.forecast(model, 5).await.unwrap();
//!     println!("{} hours", forecast.len());
//! }
//! ```

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{ForecastError, Result};
use crate::models::ForecastTable;
use crate::pipeline::Predictor;
use crate::session::{CalendarSource, Endpoints};
use crate::ForecastSdk;

// ---------------------------------------------------------------------------
// AsyncForecastSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncForecastSdk`] instance.
#[derive(Default)]
pub struct AsyncForecastSdkBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Option<Duration>,
    location: Option<(f64, f64)>,
    endpoints: Option<Endpoints>,
    memoize: Option<bool>,
    calendar_source: Option<CalendarSource>,
    reference_date: Option<NaiveDate>,
}

impl AsyncForecastSdkBuilder {
    /// Set the weather location.
    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some((latitude, longitude));
        self
    }

    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override provider endpoints.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Reuse identical provider responses within the session.
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = Some(memoize);
        self
    }

    /// Choose where the holiday reference table is read from.
    pub fn calendar_source(mut self, source: CalendarSource) -> Self {
        self.calendar_source = Some(source);
        self
    }

    /// Pin the date treated as "today".
    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Build the async SDK on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncForecastSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = ForecastSdk::builder().offline(self.offline);
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some((lat, lon)) = self.location {
                builder = builder.location(lat, lon);
            }
            if let Some(endpoints) = self.endpoints {
                builder = builder.endpoints(endpoints);
            }
            if let Some(memoize) = self.memoize {
                builder = builder.memoize(memoize);
            }
            if let Some(source) = self.calendar_source {
                builder = builder.calendar_source(source);
            }
            if let Some(date) = self.reference_date {
                builder = builder.reference_date(date);
            }
            let sdk = builder.build()?;
            Ok(AsyncForecastSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| ForecastError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncForecastSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`ForecastSdk`].
///
/// The underlying [`ForecastSdk`] is protected by a [`Mutex`] since its
/// session uses `RefCell` internally, so operations run one at a time.
pub struct AsyncForecastSdk {
    inner: Arc<Mutex<ForecastSdk>>,
}

impl AsyncForecastSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncForecastSdkBuilder {
        AsyncForecastSdkBuilder::default()
    }

    /// Wrap an already configured SDK.
    pub fn from_sdk(sdk: ForecastSdk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sdk)),
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ForecastSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| ForecastError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| ForecastError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Forecast the next `horizon_days` days at the configured location.
    pub async fn forecast<P>(&self, predictor: P, horizon_days: u8) -> Result<ForecastTable>
    where
        P: Predictor + Send + 'static,
    {
        self.run(move |s| s.forecast(&predictor, horizon_days)).await
    }
}
