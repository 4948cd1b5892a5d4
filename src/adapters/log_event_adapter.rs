//! Event sink that forwards backtest events to the `log` facade.

use log::debug;

use crate::domain::event::BacktestEvent;
use crate::ports::event_port::EventPort;

pub struct LogEventAdapter {
    symbol: String,
    emitted: usize,
}

impl LogEventAdapter {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            emitted: 0,
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn describe(&self, event: &BacktestEvent) -> String {
        match event {
            BacktestEvent::PositionOpened {
                date,
                price,
                shares,
                stop_loss_price,
                capital,
            } => format!(
                "{} {date}: bought {shares} @ {price:.2} (stop {stop_loss_price:.2}, cash {capital:.2})",
                self.symbol
            ),
            BacktestEvent::SignalDropped {
                date,
                price,
                capital,
            } => format!(
                "{} {date}: buy signal dropped @ {price:.2} (cash {capital:.2})",
                self.symbol
            ),
            BacktestEvent::PositionClosed {
                date,
                price,
                shares,
                pnl,
                reason,
                capital,
            } => format!(
                "{} {date}: sold {shares} @ {price:.2} on {reason}, pnl {pnl:.2} (cash {capital:.2})",
                self.symbol
            ),
        }
    }
}

impl EventPort for LogEventAdapter {
    fn emit(&mut self, event: &BacktestEvent) {
        self.emitted += 1;
        debug!("{}", self.describe(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::CloseReason;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn describes_entry() {
        let adapter = LogEventAdapter::new("SBIN.NS");
        let line = adapter.describe(&BacktestEvent::PositionOpened {
            date: date(),
            price: 100.0,
            shares: 10,
            stop_loss_price: 95.0,
            capital: 99_000.0,
        });
        assert_eq!(
            line,
            "SBIN.NS 2024-06-03: bought 10 @ 100.00 (stop 95.00, cash 99000.00)"
        );
    }

    #[test]
    fn describes_exit_with_reason() {
        let adapter = LogEventAdapter::new("SBIN.NS");
        let line = adapter.describe(&BacktestEvent::PositionClosed {
            date: date(),
            price: 94.0,
            shares: 10,
            pnl: -60.0,
            reason: CloseReason::StopLoss,
            capital: 99_940.0,
        });
        assert!(line.contains("on stop_loss"));
        assert!(line.contains("pnl -60.00"));
    }

    #[test]
    fn counts_emitted_events() {
        let mut adapter = LogEventAdapter::new("SBIN.NS");
        adapter.emit(&BacktestEvent::SignalDropped {
            date: date(),
            price: 10.0,
            capital: 5.0,
        });
        adapter.emit(&BacktestEvent::SignalDropped {
            date: date(),
            price: 10.0,
            capital: 5.0,
        });
        assert_eq!(adapter.emitted(), 2);
    }
}
