//! Trade statistics over completed ledgers.

use super::backtest::Ledger;
use super::position::ClosedTrade;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeSummary {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub avg_return_pct: f64,
    pub total_pnl: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_holding_days: f64,
}

impl TradeSummary {
    pub fn compute(trades: &[ClosedTrade]) -> Self {
        Self::tally(trades.iter())
    }

    /// Pool the trades of every ledger into one summary.
    pub fn across(ledgers: &[Ledger]) -> Self {
        Self::tally(ledgers.iter().flat_map(|l| l.trades.iter()))
    }

    fn tally<'a>(trades: impl Iterator<Item = &'a ClosedTrade>) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_return_pct = 0.0_f64;
        let mut total_holding_days = 0i64;

        for trade in trades {
            let pnl = trade.pnl;
            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                trades_breakeven += 1;
            }
            total_return_pct += trade.return_pct;
            total_holding_days += trade.holding_days;
        }

        let total_trades = trades_won + trades_lost + trades_breakeven;
        if total_trades == 0 {
            return Self::default();
        }
        let n = total_trades as f64;

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        TradeSummary {
            total_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate: trades_won as f64 / n,
            avg_return_pct: total_return_pct / n,
            total_pnl: total_wins - total_losses,
            profit_factor,
            largest_win,
            largest_loss,
            avg_holding_days: total_holding_days as f64 / n,
        }
    }
}

/// Fractional change from initial to final capital.
pub fn total_return(ledger: &Ledger) -> f64 {
    if ledger.initial_capital > 0.0 {
        (ledger.final_capital - ledger.initial_capital) / ledger.initial_capital
    } else {
        0.0
    }
}
