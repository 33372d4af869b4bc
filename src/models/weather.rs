use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WeatherRecord — One hour of weather at the configured location
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Epoch milliseconds of `datetime`.
    pub timestamp: i64,
    pub datetime: NaiveDateTime,
    pub date: NaiveDate,
    pub hour: u32,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub snowfall: f64,
    /// WMO weather interpretation code, carried as float like the other
    /// measurements.
    pub weather_code: f64,
    pub cloud_cover: f64,
    pub wind_speed_10m: f64,
    pub wind_gusts_10m: f64,
}

impl WeatherRecord {
    /// Build a record from an hourly instant and the measurements in
    /// [`HOURLY_FIELDS`](crate::config::HOURLY_FIELDS) order.
    pub fn from_measurements(datetime: NaiveDateTime, values: [f64; 9]) -> Self {
        let [temperature_2m, relative_humidity_2m, precipitation, rain, snowfall, weather_code, cloud_cover, wind_speed_10m, wind_gusts_10m] =
            values;
        Self {
            timestamp: datetime.and_utc().timestamp_millis(),
            datetime,
            date: datetime.date(),
            hour: datetime.hour(),
            temperature_2m,
            relative_humidity_2m,
            precipitation,
            rain,
            snowfall,
            weather_code,
            cloud_cover,
            wind_speed_10m,
            wind_gusts_10m,
        }
    }
}
