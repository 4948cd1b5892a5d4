//! Backtest engine and event loop.
//!
//! A run walks the bar series once. Each bar is resolved completely before
//! the next: stop-loss first, then either an entry (if the bar started flat)
//! or a signal exit (if it started holding). Whatever is still held after the
//! last bar is liquidated at its close.

use chrono::NaiveDate;

use super::bar::SignalBar;
use super::error::ValidationError;
use super::event::BacktestEvent;
use super::execution::{enter_long, exit_position, EntryResult};
use super::position::{CloseReason, ClosedTrade, PositionState};
use super::validation::{validate_bars, validate_capital};
use crate::ports::event_port::{EventPort, NullEventPort};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

/// Completed trades of one run, in the order they closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub symbol: String,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub trades: Vec<ClosedTrade>,
}

impl Ledger {
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn total_pnl(&self) -> f64 {
        self.trades.iter().map(|t| t.pnl).sum()
    }
}

/// Run a backtest with no event observer.
pub fn run(bars: &[SignalBar], initial_capital: f64) -> Result<Ledger, ValidationError> {
    run_with_events(bars, initial_capital, &mut NullEventPort)
}

/// Run a backtest, reporting every transition to `events`.
pub fn run_with_events(
    bars: &[SignalBar],
    initial_capital: f64,
    events: &mut dyn EventPort,
) -> Result<Ledger, ValidationError> {
    validate_capital(initial_capital)?;
    validate_bars(bars)?;

    let mut sim = Simulation::new(&bars[0].code, initial_capital);
    for bar in bars {
        sim.step(bar, events);
    }
    // validate_bars rejected the empty series
    let last = &bars[bars.len() - 1];
    Ok(sim.finish(last, events))
}

struct Simulation {
    symbol: String,
    initial_capital: f64,
    cash: f64,
    state: PositionState,
    trades: Vec<ClosedTrade>,
}

impl Simulation {
    fn new(symbol: &str, initial_capital: f64) -> Self {
        Simulation {
            symbol: symbol.to_string(),
            initial_capital,
            cash: initial_capital,
            state: PositionState::Flat,
            trades: Vec::new(),
        }
    }

    fn step(&mut self, bar: &SignalBar, events: &mut dyn EventPort) {
        let started_flat = self.state.is_flat();

        let stopped_out = self
            .state
            .position()
            .is_some_and(|pos| pos.should_stop_loss(bar.close));
        if stopped_out {
            self.close(bar.date, bar.close, CloseReason::StopLoss, events);
            return;
        }

        if started_flat {
            if bar.buy_signal {
                self.try_enter(bar, events);
            }
        } else if bar.sell_signal {
            self.close(bar.date, bar.close, CloseReason::Signal, events);
        }
    }

    fn try_enter(&mut self, bar: &SignalBar, events: &mut dyn EventPort) {
        match enter_long(&mut self.state, &mut self.cash, bar.close, bar.date) {
            EntryResult::Entered { shares, .. } => {
                let stop_loss_price = self
                    .state
                    .position()
                    .map(|pos| pos.stop_loss_price)
                    .unwrap_or_default();
                events.emit(&BacktestEvent::PositionOpened {
                    date: bar.date,
                    price: bar.close,
                    shares,
                    stop_loss_price,
                    capital: self.cash,
                });
            }
            EntryResult::InsufficientCapital => {
                events.emit(&BacktestEvent::SignalDropped {
                    date: bar.date,
                    price: bar.close,
                    capital: self.cash,
                });
            }
            EntryResult::AlreadyHolding => {}
        }
    }

    fn close(
        &mut self,
        date: NaiveDate,
        price: f64,
        reason: CloseReason,
        events: &mut dyn EventPort,
    ) {
        let Some(trade) = exit_position(
            &mut self.state,
            &mut self.cash,
            &self.symbol,
            price,
            date,
            reason,
        ) else {
            return;
        };

        events.emit(&BacktestEvent::PositionClosed {
            date,
            price,
            shares: trade.shares,
            pnl: trade.pnl,
            reason,
            capital: self.cash,
        });
        self.trades.push(trade);
    }

    fn finish(mut self, last: &SignalBar, events: &mut dyn EventPort) -> Ledger {
        if !self.state.is_flat() {
            self.close(
                last.date,
                last.close,
                CloseReason::ForcedLiquidation,
                events,
            );
        }

        Ledger {
            symbol: self.symbol,
            initial_capital: self.initial_capital,
            final_capital: self.cash,
            trades: self.trades,
        }
    }
}
