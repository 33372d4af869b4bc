//! Query-string builder for provider requests.
//!
//! Parameters keep their insertion order, so the same request always produces
//! the same memoization key. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use elspot_forecast::QueryParams;
//! let params = QueryParams::new()
//!     .param("latitude", 57.048)
//!     .param("longitude", 9.9187)
//!     .param("forecast_days", 5)
//!     .build();
//! assert_eq!(params[2], ("forecast_days".to_string(), "5".to_string()));
//! ```

use chrono::NaiveDate;
use std::fmt::Display;

/// Builds ordered `(key, value)` query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn param(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a date-bounded window in the price provider's format:
    /// `start=<start>T00:00`, `end=<end>T23:59`.
    pub fn day_window(&mut self, start: NaiveDate, end: NaiveDate) -> &mut Self {
        self.param("start", format!("{}T00:00", start.format("%Y-%m-%d")));
        self.param("end", format!("{}T23:59", end.format("%Y-%m-%d")));
        self
    }

    /// Append a date-bounded window in the weather archive's format:
    /// `start_date=<start>`, `end_date=<end>`.
    pub fn date_span(&mut self, start: NaiveDate, end: NaiveDate) -> &mut Self {
        self.param("start_date", start.format("%Y-%m-%d"));
        self.param("end_date", end.format("%Y-%m-%d"));
        self
    }

    /// Look up the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The parameters in insertion order, ready for `RequestBuilder::query`.
    pub fn build(&self) -> Vec<(String, String)> {
        self.pairs.clone()
    }

    /// Key identifying this request for memoization.
    ///
    /// Values are not URL-encoded; the key never leaves the process.
    pub fn cache_key(&self, url: &str) -> String {
        if self.pairs.is_empty() {
            return url.to_string();
        }
        let query: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", url, query.join("&"))
    }
}
