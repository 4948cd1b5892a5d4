//! Input checks run before a backtest starts.

use crate::domain::bar::SignalBar;
use crate::domain::error::ValidationError;

pub fn validate_capital(initial_capital: f64) -> Result<(), ValidationError> {
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(ValidationError::InvalidCapital {
            value: initial_capital,
        });
    }
    Ok(())
}

/// Reject empty, unordered, mixed-symbol or non-numeric series.
///
/// Order is checked, never repaired: a series out of chronological order
/// is an upstream bug.
pub fn validate_bars(bars: &[SignalBar]) -> Result<(), ValidationError> {
    let first = bars.first().ok_or(ValidationError::EmptySeries)?;

    for (index, bar) in bars.iter().enumerate() {
        if bar.code != first.code {
            return Err(ValidationError::MixedSymbols {
                index,
                expected: first.code.clone(),
                found: bar.code.clone(),
            });
        }

        for (field, value) in bar.prices() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidPrice {
                    index,
                    field,
                    value,
                });
            }
        }

        if bar.volume < 0 {
            return Err(ValidationError::NegativeVolume {
                index,
                volume: bar.volume,
            });
        }

        if index > 0 {
            let previous = bars[index - 1].date;
            if bar.date <= previous {
                return Err(ValidationError::NonIncreasingDate {
                    index,
                    previous,
                    current: bar.date,
                });
            }
        }
    }

    Ok(())
}
