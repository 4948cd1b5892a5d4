//! Symbol universe for batch backtesting.
//!
//! Parses code lists from configuration and decides, per symbol, whether
//! enough history exists and which trailing slice of it gets backtested.

use std::collections::HashSet;

pub const MIN_HISTORY_BARS: usize = 200;
pub const MIN_WINDOW_BARS: usize = 126;
pub const WINDOW_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),

    #[error("no codes configured and none found in data directory")]
    NoCodes,

    #[error("all codes were skipped")]
    AllCodesSkipped,
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if seen.contains(&code) {
            return Err(UniverseError::DuplicateCode(code));
        }
        seen.insert(code.clone());
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed { reason: String },
    NoData,
    InsufficientBars { bars: usize },
    Invalid { reason: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::FetchFailed { reason } => write!(f, "fetch failed: {reason}"),
            SkipReason::NoData => f.write_str("no data found"),
            SkipReason::InsufficientBars { bars } => write!(f, "only {bars} bars"),
            SkipReason::Invalid { reason } => write!(f, "invalid bars: {reason}"),
        }
    }
}

/// Number of trailing bars to backtest out of `available`.
///
/// The larger of `min_window` and `fraction` of the history, never more
/// than what exists.
pub fn backtest_window(available: usize, min_window: usize, fraction: f64) -> usize {
    let proportional = (available as f64 * fraction).floor() as usize;
    min_window.max(proportional).min(available)
}
