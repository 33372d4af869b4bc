//! Joins weather, calendar and price tables into model input.

use std::collections::HashMap;
use tracing::debug;

use crate::models::{
    CalendarTable, FeatureRow, FeatureTable, LabeledFeatureTable, PriceArea, PriceTable,
    WeatherRecord,
};

/// Inner-join weather hours with the calendar on `date`.
///
/// Hours whose date the calendar does not cover are dropped; the remaining
/// hours keep their input order.
pub fn assemble(weather: &[WeatherRecord], calendar: &CalendarTable) -> FeatureTable {
    let mut table = FeatureTable::default();
    for w in weather {
        if let Some(day) = calendar.get(w.date) {
            table.push(w.datetime, FeatureRow::new(w, day));
        }
    }
    let dropped = weather.len() - table.len();
    if dropped > 0 {
        debug!(dropped, "weather hours outside calendar coverage");
    }
    table
}

/// Like [`assemble`], additionally inner-joined with `area`'s realized price
/// on `timestamp`. Hours without a price for `area` are dropped.
pub fn assemble_with_prices(
    weather: &[WeatherRecord],
    calendar: &CalendarTable,
    prices: &PriceTable,
    area: PriceArea,
) -> LabeledFeatureTable {
    let by_time: HashMap<i64, f64> = prices
        .rows
        .iter()
        .filter_map(|row| row.price(area).map(|p| (row.timestamp, p)))
        .collect();

    let mut features = FeatureTable::default();
    let mut targets = Vec::new();
    for w in weather {
        let (Some(day), Some(&price)) = (calendar.get(w.date), by_time.get(&w.timestamp)) else {
            continue;
        };
        features.push(w.datetime, FeatureRow::new(w, day));
        targets.push(price);
    }
    debug!(
        kept = targets.len(),
        dropped = weather.len() - targets.len(),
        %area,
        "assembled labeled features"
    );
    LabeledFeatureTable {
        area,
        features,
        targets,
    }
}
