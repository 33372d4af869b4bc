use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `type` value marking weekends and public holidays in the reference table.
pub const NOT_A_WORKDAY: &str = "Not a Workday";

// ---------------------------------------------------------------------------
// CalendarRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub date: NaiveDate,
    /// Monday = 0 through Sunday = 6.
    pub day_of_week: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub is_workday: bool,
}

impl CalendarRecord {
    /// Derive the calendar fields for `date` from its reference `type`.
    pub fn new(date: NaiveDate, day_type: &str) -> Self {
        Self {
            date,
            day_of_week: date.weekday().num_days_from_monday(),
            day: date.day(),
            month: date.month(),
            year: date.year(),
            is_workday: day_type.trim() != NOT_A_WORKDAY,
        }
    }
}

// ---------------------------------------------------------------------------
// CalendarTable
// ---------------------------------------------------------------------------

/// One record per date, in reference order, with a date index.
#[derive(Debug, Clone, Default)]
pub struct CalendarTable {
    records: Vec<CalendarRecord>,
    index: HashMap<NaiveDate, usize>,
}

impl CalendarTable {
    /// Build a table from records. A later record for an already seen date
    /// replaces the earlier one.
    pub fn from_records(records: impl IntoIterator<Item = CalendarRecord>) -> Self {
        let mut table = Self::default();
        for rec in records {
            match table.index.get(&rec.date) {
                Some(&i) => table.records[i] = rec,
                None => {
                    table.index.insert(rec.date, table.records.len());
                    table.records.push(rec);
                }
            }
        }
        table
    }

    pub fn get(&self, date: NaiveDate) -> Option<&CalendarRecord> {
        self.index.get(&date).map(|&i| &self.records[i])
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index.contains_key(&date)
    }

    pub fn records(&self) -> &[CalendarRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last date covered.
    pub fn coverage(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}
