use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ForecastRow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub time: NaiveDateTime,
    pub predicted_price: f64,
}

// ---------------------------------------------------------------------------
// ForecastTable — Predictions sorted ascending by time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    /// Build a table, sorting rows by time. Rows sharing a time keep their
    /// input order.
    pub fn new(mut rows: Vec<ForecastRow>) -> Self {
        rows.sort_by_key(|r| r.time);
        Self { rows }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep the first `days * 24` hourly rows.
    pub fn first_days(&self, days: usize) -> ForecastTable {
        ForecastTable {
            rows: self.rows.iter().take(days.saturating_mul(24)).cloned().collect(),
        }
    }

    /// Number of whole days covered by the hourly rows.
    pub fn day_count(&self) -> usize {
        self.rows.len() / 24
    }

    pub fn predictions(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.predicted_price).collect()
    }
}

// ---------------------------------------------------------------------------
// ForecastMatrix — time-of-day × date pivot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastMatrix {
    /// Row labels, `HH:MM`, ascending.
    pub times_of_day: Vec<String>,
    /// Column labels, `YYYY-MM-DD`, ascending.
    pub dates: Vec<String>,
    /// `cells[row][column]`; `None` where the forecast has no value.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl ForecastMatrix {
    pub fn get(&self, time_of_day: &str, date: &str) -> Option<f64> {
        let r = self.times_of_day.iter().position(|t| t == time_of_day)?;
        let c = self.dates.iter().position(|d| d == date)?;
        self.cells[r][c]
    }

    pub fn row_count(&self) -> usize {
        self.times_of_day.len()
    }

    pub fn column_count(&self) -> usize {
        self.dates.len()
    }

    /// True when every cell holds a value.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }
}

impl fmt::Display for ForecastMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<11}", "time_of_day")?;
        for date in &self.dates {
            write!(f, " {:>10}", date)?;
        }
        writeln!(f)?;
        for (tod, row) in self.times_of_day.iter().zip(&self.cells) {
            write!(f, "{:<11}", tod)?;
            for cell in row {
                match cell {
                    Some(v) => write!(f, " {:>10.4}", v)?,
                    None => write!(f, " {:>10}", "")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
