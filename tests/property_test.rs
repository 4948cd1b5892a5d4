//! Property tests for engine invariants.
//!
//! Uses proptest to verify, over random signal series:
//! 1. Completeness: every opened position ends up in the ledger
//! 2. Sizing: shares stay within 1..=10 and never exceed capital
//! 3. Accounting: trade P&L and final capital agree with prices
//! 4. Solvency: capital never goes negative
//! 5. Determinism: identical input, identical ledger

mod common;

use common::*;
use proptest::prelude::*;
use sigtrader::domain::backtest::{run, run_with_events};
use sigtrader::domain::bar::SignalBar;
use sigtrader::domain::event::BacktestEvent;
use sigtrader::domain::execution::MAX_POSITION_SHARES;
use sigtrader::domain::position::CloseReason;

// ── Strategies ───────────────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..200.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_capital() -> impl Strategy<Value = f64> {
    (1.0..5000.0_f64).prop_map(|c| (c * 100.0).round() / 100.0)
}

fn arb_series() -> impl Strategy<Value = Vec<SignalBar>> {
    prop::collection::vec((arb_price(), any::<bool>(), any::<bool>()), 1..60)
        .prop_map(|specs| make_series("PROP", &specs))
}

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

// ── 1. Completeness ──────────────────────────────────────────────────

proptest! {
    /// Every entry is matched by exactly one ledger row, and nothing stays open.
    #[test]
    fn every_entry_is_closed(bars in arb_series(), capital in arb_capital()) {
        let mut events: Vec<BacktestEvent> = Vec::new();
        let ledger = run_with_events(&bars, capital, &mut events).unwrap();

        let opened = events
            .iter()
            .filter(|e| matches!(e, BacktestEvent::PositionOpened { .. }))
            .count();
        let closed = events
            .iter()
            .filter(|e| matches!(e, BacktestEvent::PositionClosed { .. }))
            .count();
        prop_assert_eq!(opened, ledger.trades.len());
        prop_assert_eq!(closed, ledger.trades.len());

        let last_date = bars[bars.len() - 1].date;
        for trade in &ledger.trades {
            prop_assert!(trade.entry_date <= trade.exit_date);
            prop_assert!(trade.exit_date <= last_date);
        }
    }

    /// Trades never overlap and never re-enter on the bar that closed them.
    #[test]
    fn trades_are_sequential(bars in arb_series(), capital in arb_capital()) {
        let ledger = run(&bars, capital).unwrap();
        for pair in ledger.trades.windows(2) {
            prop_assert!(pair[0].exit_date < pair[1].entry_date);
        }
    }
}

// ── 2. Sizing ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn shares_within_cap(bars in arb_series(), capital in arb_capital()) {
        let ledger = run(&bars, capital).unwrap();
        for trade in &ledger.trades {
            prop_assert!(trade.shares >= 1);
            prop_assert!(trade.shares <= MAX_POSITION_SHARES);
        }
    }

    /// Entry cost never exceeds the cash available before the entry.
    #[test]
    fn entries_are_funded(bars in arb_series(), capital in arb_capital()) {
        let mut events: Vec<BacktestEvent> = Vec::new();
        run_with_events(&bars, capital, &mut events).unwrap();

        let mut cash = capital;
        for event in &events {
            if let BacktestEvent::PositionOpened { price, shares, .. } = event {
                prop_assert!(price * f64::from(*shares) <= cash + 1e-9);
            }
            cash = event.capital();
        }
    }
}

// ── 3. Accounting ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn pnl_matches_prices(bars in arb_series(), capital in arb_capital()) {
        let ledger = run(&bars, capital).unwrap();
        for trade in &ledger.trades {
            let expected = (trade.exit_price - trade.entry_price) * f64::from(trade.shares);
            prop_assert!(close_enough(trade.pnl, expected));
            if trade.close_reason == CloseReason::StopLoss {
                prop_assert!(trade.exit_price < trade.stop_loss_price);
            }
        }
    }

    #[test]
    fn final_capital_is_initial_plus_pnl(bars in arb_series(), capital in arb_capital()) {
        let ledger = run(&bars, capital).unwrap();
        prop_assert!(close_enough(ledger.final_capital, capital + ledger.total_pnl()));
    }
}

// ── 4. Solvency ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn capital_never_negative(bars in arb_series(), capital in arb_capital()) {
        let mut events: Vec<BacktestEvent> = Vec::new();
        let ledger = run_with_events(&bars, capital, &mut events).unwrap();
        for event in &events {
            prop_assert!(event.capital() >= 0.0);
        }
        prop_assert!(ledger.final_capital >= 0.0);
    }
}

// ── 5. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn runs_are_deterministic(bars in arb_series(), capital in arb_capital()) {
        let first = run(&bars, capital).unwrap();
        let second = run(&bars, capital).unwrap();
        prop_assert_eq!(first, second);
    }
}
