//! Per-symbol batch orchestration.
//!
//! Each symbol is loaded, screened and backtested on its own. A symbol that
//! fails at any stage is recorded as skipped; the rest of the batch carries
//! on.

use chrono::NaiveDate;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::domain::backtest::{self, Ledger, DEFAULT_INITIAL_CAPITAL};
use crate::domain::bar::signal_counts;
use crate::domain::universe::{
    backtest_window, SkipReason, SkippedCode, MIN_HISTORY_BARS, MIN_WINDOW_BARS, WINDOW_FRACTION,
};
use crate::ports::data_port::DataPort;
use crate::ports::event_port::EventPort;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub initial_capital: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_bars: usize,
    pub min_window: usize,
    pub window_fraction: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            start_date: None,
            end_date: None,
            min_bars: MIN_HISTORY_BARS,
            min_window: MIN_WINDOW_BARS,
            window_fraction: WINDOW_FRACTION,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// One ledger per backtested symbol, in input order.
    pub ledgers: Vec<Ledger>,
    pub skipped: Vec<SkippedCode>,
}

enum Outcome {
    Ran(Ledger),
    Skipped(SkippedCode),
}

/// Backtest every code, in parallel.
///
/// `make_events` builds the event sink for one symbol's run.
pub fn run_batch<F, E>(
    data_port: &dyn DataPort,
    codes: &[String],
    config: &BatchConfig,
    make_events: F,
) -> BatchResult
where
    F: Fn(&str) -> E + Sync,
    E: EventPort,
{
    let outcomes: Vec<Outcome> = codes
        .par_iter()
        .map(|code| run_symbol(data_port, code, config, &mut make_events(code.as_str())))
        .collect();

    let mut result = BatchResult::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Ran(ledger) => result.ledgers.push(ledger),
            Outcome::Skipped(skipped) => {
                warn!("skipping {} ({})", skipped.code, skipped.reason);
                result.skipped.push(skipped);
            }
        }
    }
    result
}

fn run_symbol(
    data_port: &dyn DataPort,
    code: &str,
    config: &BatchConfig,
    events: &mut dyn EventPort,
) -> Outcome {
    let skip = |reason| {
        Outcome::Skipped(SkippedCode {
            code: code.to_string(),
            reason,
        })
    };

    let bars = match data_port.fetch_bars(code, config.start_date, config.end_date) {
        Ok(bars) => bars,
        Err(e) => {
            return skip(SkipReason::FetchFailed {
                reason: e.to_string(),
            })
        }
    };

    if bars.is_empty() {
        return skip(SkipReason::NoData);
    }
    if bars.len() < config.min_bars {
        return skip(SkipReason::InsufficientBars { bars: bars.len() });
    }

    let window = backtest_window(bars.len(), config.min_window, config.window_fraction);
    let window_bars = &bars[bars.len() - window..];
    let (buys, sells) = signal_counts(window_bars);
    info!(
        "{code}: backtesting last {window} of {} bars (buy signals: {buys}, sell signals: {sells})",
        bars.len()
    );

    match backtest::run_with_events(window_bars, config.initial_capital, events) {
        Ok(ledger) => {
            debug!("{code}: {} trades closed", ledger.trades.len());
            Outcome::Ran(ledger)
        }
        Err(e) => skip(SkipReason::Invalid {
            reason: e.to_string(),
        }),
    }
}
