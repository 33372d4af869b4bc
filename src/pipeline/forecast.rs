//! Prediction and pivoting of forecast tables.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::Predictor;
use crate::error::{ForecastError, Result};
use crate::models::{
    validate_schema, FeatureMatrix, FeatureTable, ForecastMatrix, ForecastRow, ForecastTable,
};

/// Predict every row of `features` in one call and pair each prediction with
/// `identifiers[i]`. The result is sorted ascending by time.
pub fn build_forecast<P: Predictor + ?Sized>(
    features: &FeatureMatrix,
    identifiers: &[NaiveDateTime],
    predictor: &P,
) -> Result<ForecastTable> {
    if features.len() != identifiers.len() {
        return Err(ForecastError::LengthMismatch {
            rows: features.len(),
            values: identifiers.len(),
            what: "identifiers",
        });
    }
    if let Some(expected) = predictor.expected_columns() {
        validate_schema(expected.as_slice())?;
    }
    if features.is_empty() {
        debug!("no feature rows to predict");
        return Ok(ForecastTable::default());
    }

    let predictions = predictor.predict(features)?;
    if predictions.len() != features.len() {
        return Err(ForecastError::LengthMismatch {
            rows: features.len(),
            values: predictions.len(),
            what: "predictions",
        });
    }

    let rows = identifiers
        .iter()
        .zip(predictions)
        .map(|(&time, predicted_price)| ForecastRow {
            time,
            predicted_price,
        })
        .collect();
    Ok(ForecastTable::new(rows))
}

impl FeatureTable {
    /// Predict this table with its own identifiers.
    pub fn forecast<P: Predictor + ?Sized>(&self, predictor: &P) -> Result<ForecastTable> {
        build_forecast(&self.matrix(), self.identifiers(), predictor)
    }
}

/// Pivot a forecast into time-of-day rows and date columns.
///
/// Missing (date, time-of-day) pairs stay empty. Two rows falling into the
/// same cell are rejected.
pub fn to_matrix(forecast: &ForecastTable) -> Result<ForecastMatrix> {
    let mut values: BTreeMap<(String, String), f64> = BTreeMap::new();
    let mut dates = BTreeSet::new();
    let mut times = BTreeSet::new();

    for row in forecast.rows() {
        let date = row.time.format("%Y-%m-%d").to_string();
        let tod = row.time.format("%H:%M").to_string();
        if values
            .insert((tod.clone(), date.clone()), row.predicted_price)
            .is_some()
        {
            return Err(ForecastError::DuplicateCell {
                date,
                time_of_day: tod,
            });
        }
        dates.insert(date);
        times.insert(tod);
    }

    let dates: Vec<String> = dates.into_iter().collect();
    let times_of_day: Vec<String> = times.into_iter().collect();
    let cells = times_of_day
        .iter()
        .map(|tod| {
            dates
                .iter()
                .map(|date| values.get(&(tod.clone(), date.clone())).copied())
                .collect()
        })
        .collect();

    Ok(ForecastMatrix {
        times_of_day,
        dates,
        cells,
    })
}

impl ForecastTable {
    /// See [`to_matrix`].
    pub fn to_matrix(&self) -> Result<ForecastMatrix> {
        to_matrix(self)
    }
}
