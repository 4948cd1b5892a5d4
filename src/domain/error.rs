//! Domain error types.

use chrono::NaiveDate;

use crate::domain::universe::UniverseError;

/// Malformed engine input. Raised before simulation starts; no partial
/// ledger accompanies it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("bar series is empty")]
    EmptySeries,

    #[error("bar {index}: date {current} does not follow {previous}")]
    NonIncreasingDate {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("bar {index}: {field} price {value} must be finite and positive")]
    InvalidPrice {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("bar {index}: volume {volume} is negative")]
    NegativeVolume { index: usize, volume: i64 },

    #[error("bar {index}: symbol {found} differs from {expected}")]
    MixedSymbols {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("initial capital {value} must be finite and positive")]
    InvalidCapital { value: f64 },
}

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) | SigtraderError::Report { .. } => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::Data { .. } => 3,
            SigtraderError::Validation(_) => 4,
            SigtraderError::Universe(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
