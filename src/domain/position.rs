//! Open position slot and closed trade records.

use chrono::NaiveDate;
use std::fmt;

/// Fraction of the entry price below which a long position is stopped out.
pub const STOP_LOSS_FRACTION: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub shares: u32,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub stop_loss_price: f64,
}

impl Position {
    pub fn open(shares: u32, entry_price: f64, entry_date: NaiveDate) -> Self {
        Position {
            shares,
            entry_price,
            entry_date,
            stop_loss_price: entry_price * STOP_LOSS_FRACTION,
        }
    }

    pub fn cost_basis(&self) -> f64 {
        self.shares as f64 * self.entry_price
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares as f64 * (price - self.entry_price)
    }

    /// Strictly below the stop; touching it does not trigger.
    pub fn should_stop_loss(&self, price: f64) -> bool {
        price < self.stop_loss_price
    }
}

/// The single position slot of a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Holding(Position),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            PositionState::Flat => None,
            PositionState::Holding(position) => Some(position),
        }
    }

    /// Leave the slot flat, returning whatever was held.
    pub fn take(&mut self) -> Option<Position> {
        match std::mem::take(self) {
            PositionState::Flat => None,
            PositionState::Holding(position) => Some(position),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    Signal,
    StopLoss,
    ForcedLiquidation,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::Signal => "signal",
            CloseReason::StopLoss => "stop_loss",
            CloseReason::ForcedLiquidation => "forced_liquidation",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub symbol: String,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: u32,
    pub stop_loss_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub pnl: f64,
    pub return_pct: f64,
    pub holding_days: i64,
    pub close_reason: CloseReason,
}

impl ClosedTrade {
    /// Settle `position` at `exit_price`, filling in the derived fields.
    pub fn settle(
        symbol: &str,
        position: &Position,
        exit_date: NaiveDate,
        exit_price: f64,
        close_reason: CloseReason,
    ) -> Self {
        let pnl = position.unrealized_pnl(exit_price);
        ClosedTrade {
            symbol: symbol.to_string(),
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            shares: position.shares,
            stop_loss_price: position.stop_loss_price,
            exit_date,
            exit_price,
            pnl,
            return_pct: pnl / position.cost_basis() * 100.0,
            holding_days: (exit_date - position.entry_date).num_days(),
            close_reason,
        }
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}
