//! Structured notifications emitted by the backtest engine.
//!
//! `capital` on every variant is the cash balance after the transition.

use chrono::NaiveDate;

use crate::domain::position::CloseReason;

#[derive(Debug, Clone, PartialEq)]
pub enum BacktestEvent {
    PositionOpened {
        date: NaiveDate,
        price: f64,
        shares: u32,
        stop_loss_price: f64,
        capital: f64,
    },
    /// A buy signal fired while flat but capital could not fund one share.
    SignalDropped {
        date: NaiveDate,
        price: f64,
        capital: f64,
    },
    PositionClosed {
        date: NaiveDate,
        price: f64,
        shares: u32,
        pnl: f64,
        reason: CloseReason,
        capital: f64,
    },
}

impl BacktestEvent {
    pub fn date(&self) -> NaiveDate {
        match self {
            BacktestEvent::PositionOpened { date, .. }
            | BacktestEvent::SignalDropped { date, .. }
            | BacktestEvent::PositionClosed { date, .. } => *date,
        }
    }

    pub fn capital(&self) -> f64 {
        match self {
            BacktestEvent::PositionOpened { capital, .. }
            | BacktestEvent::SignalDropped { capital, .. }
            | BacktestEvent::PositionClosed { capital, .. } => *capital,
        }
    }
}
