//! Danish calendar built from the holiday reference table.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;

use crate::config;
use crate::error::{ForecastError, Provider, Result};
use crate::models::{CalendarRecord, CalendarTable};
use crate::session::{CalendarSource, Session};

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    date: String,
    #[serde(rename = "type")]
    day_type: String,
}

/// Parse a semicolon-delimited `date;type` table with `DD/MM/YYYY` dates.
pub fn parse_calendar<R: Read>(reader: R) -> Result<CalendarTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize::<ReferenceRow>() {
        let row = row?;
        let date = NaiveDate::parse_from_str(&row.date, "%d/%m/%Y").map_err(|e| {
            ForecastError::malformed(Provider::Calendar, format!("bad date {:?}: {}", row.date, e))
        })?;
        records.push(CalendarRecord::new(date, &row.day_type));
    }
    Ok(CalendarTable::from_records(records))
}

/// The calendar compiled into the crate. No I/O.
pub fn build_calendar() -> Result<CalendarTable> {
    parse_calendar(config::BUNDLED_CALENDAR.as_bytes())
}

// ---------------------------------------------------------------------------
// CalendarQuery
// ---------------------------------------------------------------------------

/// Query interface for the calendar table configured on the session.
pub struct CalendarQuery<'a> {
    session: &'a Session,
}

impl<'a> CalendarQuery<'a> {
    /// Create a new `CalendarQuery` bound to the given session.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// The calendar table, built on first use and kept for the session.
    pub fn table(&self) -> Result<&'a CalendarTable> {
        if let Some(table) = self.session.calendar.get() {
            return Ok(table);
        }
        let table = self.load()?;
        Ok(self.session.calendar.get_or_init(|| table))
    }

    /// Calendar entry for one date, if the reference covers it.
    pub fn get(&self, date: NaiveDate) -> Result<Option<&'a CalendarRecord>> {
        Ok(self.table()?.get(date))
    }

    fn load(&self) -> Result<CalendarTable> {
        match &self.session.calendar_source {
            CalendarSource::Bundled => build_calendar(),
            CalendarSource::File(path) => parse_calendar(File::open(path)?),
            CalendarSource::Remote => {
                let url = &self.session.endpoints.calendar_reference;
                let contents = self.session.cache.borrow_mut().load_reference(url)?;
                parse_calendar(contents.as_bytes())
            }
        }
    }
}
