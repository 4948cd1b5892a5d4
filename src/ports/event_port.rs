//! Backtest event sink port.

use crate::domain::event::BacktestEvent;

pub trait EventPort {
    fn emit(&mut self, event: &BacktestEvent);
}

/// Discards every event.
pub struct NullEventPort;

impl EventPort for NullEventPort {
    fn emit(&mut self, _event: &BacktestEvent) {}
}

impl EventPort for Vec<BacktestEvent> {
    fn emit(&mut self, event: &BacktestEvent) {
        self.push(event.clone());
    }
}
