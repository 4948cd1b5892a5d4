//! Configuration validation.
//!
//! Validates all config fields before a batch runs.

use crate::domain::backtest::DEFAULT_INITIAL_CAPITAL;
use crate::domain::error::SigtraderError;
use crate::domain::universe::{parse_codes, MIN_HISTORY_BARS, MIN_WINDOW_BARS, WINDOW_FRACTION};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_initial_capital(config)?;
    validate_history(config)?;
    validate_window_fraction(config)?;
    validate_dates(config)?;
    validate_codes(config)?;
    validate_data_directory(config)?;
    Ok(())
}

fn invalid(key: &str, reason: &str) -> SigtraderError {
    SigtraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_history(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if config.get_int("backtest", "min_bars", MIN_HISTORY_BARS as i64) < 1 {
        return Err(invalid("min_bars", "min_bars must be at least 1"));
    }
    if config.get_int("backtest", "min_window", MIN_WINDOW_BARS as i64) < 1 {
        return Err(invalid("min_window", "min_window must be at least 1"));
    }
    Ok(())
}

fn validate_window_fraction(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "window_fraction", WINDOW_FRACTION);
    if !(value > 0.0 && value <= 1.0) {
        return Err(invalid(
            "window_fraction",
            "window_fraction must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let start_date = parse_date(config.get_string("backtest", "start_date").as_deref(), "start_date")?;
    let end_date = parse_date(config.get_string("backtest", "end_date").as_deref(), "end_date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start >= end {
            return Err(invalid("start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

/// Optional `YYYY-MM-DD` date; absent means unbounded.
pub fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, SigtraderError> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    field,
                    &format!("invalid {} format, expected YYYY-MM-DD", field),
                )
            }),
    }
}

fn validate_codes(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(codes) = config.get_string("backtest", "codes") {
        parse_codes(&codes).map_err(|e| invalid("codes", &e.to_string()))?;
    }
    Ok(())
}

fn validate_data_directory(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("data", "directory") {
        Some(_) => Ok(()),
        None => Err(SigtraderError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}
