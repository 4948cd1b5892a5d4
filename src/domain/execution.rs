//! Trade execution and fill simulation.
//!
//! Fills happen at the bar close with no slippage or commission. Sizing is a
//! fixed whole-share ceiling rather than a fraction of equity.

use chrono::NaiveDate;

use super::position::{CloseReason, ClosedTrade, Position, PositionState};

/// Hard ceiling on shares per position.
pub const MAX_POSITION_SHARES: u32 = 10;

/// Whole shares affordable at `price`, capped at [`MAX_POSITION_SHARES`].
///
/// `capital / price` can round up to an integer the cash cannot quite
/// cover; the size is walked down until the debit fits.
pub fn position_size(capital: f64, price: f64) -> u32 {
    if !(capital > 0.0 && price > 0.0) {
        return 0;
    }
    let mut size = (capital / price).min(MAX_POSITION_SHARES as f64).floor() as u32;
    while size > 0 && size as f64 * price > capital {
        size -= 1;
    }
    size
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered { shares: u32, cost: f64 },
    InsufficientCapital,
    AlreadyHolding,
}

/// Open a long position at `market_price`.
///
/// Requires cash strictly above the price, then sizes the order with
/// [`position_size`]. On success the cost is debited from `cash` and the
/// slot moves to holding.
pub fn enter_long(
    state: &mut PositionState,
    cash: &mut f64,
    market_price: f64,
    date: NaiveDate,
) -> EntryResult {
    if !state.is_flat() {
        return EntryResult::AlreadyHolding;
    }
    if *cash <= market_price {
        return EntryResult::InsufficientCapital;
    }

    let shares = position_size(*cash, market_price);
    if shares == 0 {
        return EntryResult::InsufficientCapital;
    }

    let position = Position::open(shares, market_price, date);
    let cost = position.cost_basis();
    *cash -= cost;
    *state = PositionState::Holding(position);

    EntryResult::Entered { shares, cost }
}

/// Close whatever is held at `market_price`, crediting the proceeds.
///
/// Returns `None` when the slot is already flat.
pub fn exit_position(
    state: &mut PositionState,
    cash: &mut f64,
    symbol: &str,
    market_price: f64,
    exit_date: NaiveDate,
    reason: CloseReason,
) -> Option<ClosedTrade> {
    let position = state.take()?;
    *cash += position.market_value(market_price);
    Some(ClosedTrade::settle(
        symbol,
        &position,
        exit_date,
        market_price,
        reason,
    ))
}
