//! Signal-annotated price bar.
//!
//! Bars arrive with the buy/sell decision already made by the upstream
//! indicator pipeline. The engine treats both flags as opaque.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalBar {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub buy_signal: bool,
    pub sell_signal: bool,
}

impl SignalBar {
    /// Price fields paired with their column names, in OHLC order.
    pub fn prices(&self) -> [(&'static str, f64); 4] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
    }
}

/// Count of (buy, sell) flags raised across a series.
pub fn signal_counts(bars: &[SignalBar]) -> (usize, usize) {
    bars.iter().fold((0, 0), |(buys, sells), bar| {
        (
            buys + usize::from(bar.buy_signal),
            sells + usize::from(bar.sell_signal),
        )
    })
}
