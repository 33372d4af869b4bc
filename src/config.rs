use std::path::PathBuf;

pub const WEATHER_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const WEATHER_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const ENERGY_DATA_BASE: &str = "https://api.energidataservice.dk/dataset";

pub const SPOT_PRICE_DATASET: &str = "Elspotprices";
pub const RENEWABLE_FORECAST_DATASET: &str = "Forecasts_Hour";

/// Remote copy of the Danish holiday reference table.
pub const CALENDAR_REFERENCE_URL: &str =
    "https://raw.githubusercontent.com/Camillahannesbo/MLOPs-Assignment-/main/data/calendar_incl_holiday.csv";
pub const CALENDAR_REFERENCE_FILE: &str = "calendar_incl_holiday.csv";

/// Bundled holiday reference table (2022-01-01 through 2027-12-31).
pub const BUNDLED_CALENDAR: &str = include_str!("../data/calendar_incl_holiday.csv");

/// Aalborg, Denmark.
pub const DEFAULT_LATITUDE: f64 = 57.048;
pub const DEFAULT_LONGITUDE: f64 = 9.9187;

pub const DEFAULT_FORECAST_DAYS: u8 = 5;
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Hourly measurements requested from the weather provider, in response order.
pub const HOURLY_FIELDS: [&str; 9] = [
    "temperature_2m",
    "relative_humidity_2m",
    "precipitation",
    "rain",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "wind_speed_10m",
    "wind_gusts_10m",
];

pub fn hourly_fields_param() -> String {
    HOURLY_FIELDS.join(",")
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("elspot-forecast")
    } else {
        PathBuf::from(".elspot-forecast-cache")
    }
}
