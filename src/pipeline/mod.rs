//! Feature assembly and forecasting.
//!
//! Data flows one way: weather and calendar (and optionally prices) are
//! joined by [`assemble`], the resulting [`FeatureTable`] is predicted in a
//! single batch by a [`Predictor`], and [`to_matrix`] pivots the sorted
//! forecast for display.

pub mod assemble;
pub mod forecast;

pub use assemble::{assemble, assemble_with_prices};
pub use forecast::{build_forecast, to_matrix};

use crate::error::Result;
use crate::models::{CalendarTable, FeatureMatrix, FeatureTable, ForecastTable};
use crate::queries::{WeatherRequest, WeatherSource};

/// The regression model boundary.
///
/// Implemented for any `Fn(&FeatureMatrix) -> Result<Vec<f64>>`.
pub trait Predictor {
    /// One prediction per matrix row, in row order.
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Columns the model was trained on, if known. Checked against
    /// [`FEATURE_COLUMNS`](crate::models::FEATURE_COLUMNS) before predicting.
    fn expected_columns(&self) -> Option<Vec<String>> {
        None
    }
}

impl<F> Predictor for F
where
    F: Fn(&FeatureMatrix) -> Result<Vec<f64>>,
{
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        self(features)
    }
}

/// Fetch weather for `request`, join it with `calendar` and predict.
pub fn forecast_prices<W, P>(
    weather: &W,
    calendar: &CalendarTable,
    request: &WeatherRequest,
    predictor: &P,
) -> Result<ForecastTable>
where
    W: WeatherSource + ?Sized,
    P: Predictor + ?Sized,
{
    let records = weather.fetch_weather(request)?;
    let features: FeatureTable = assemble(&records, calendar);
    features.forecast(predictor)
}
