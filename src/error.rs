use std::fmt;

/// External data provider an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Weather,
    Prices,
    Calendar,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Weather => f.write_str("weather provider"),
            Provider::Prices => f.write_str("price provider"),
            Provider::Calendar => f.write_str("calendar reference"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Failed to fetch from {provider}: {source}")]
    Fetch {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from {provider}: {detail}")]
    MalformedResponse { provider: Provider, detail: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Feature schema mismatch: expected [{expected}], got [{actual}]")]
    SchemaMismatch { expected: String, actual: String },

    #[error("Length mismatch: {rows} feature rows but {values} {what}")]
    LengthMismatch {
        rows: usize,
        values: usize,
        what: &'static str,
    },

    #[error("Duplicate forecast cell at date {date}, time {time_of_day}")]
    DuplicateCell { date: String, time_of_day: String },
}

impl ForecastError {
    pub(crate) fn malformed(provider: Provider, detail: impl Into<String>) -> Self {
        ForecastError::MalformedResponse {
            provider,
            detail: detail.into(),
        }
    }

    /// The provider this error is attributed to, if any.
    pub fn provider(&self) -> Option<Provider> {
        match self {
            ForecastError::Fetch { provider, .. }
            | ForecastError::MalformedResponse { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
