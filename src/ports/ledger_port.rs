//! Trade ledger output port.

use std::path::PathBuf;

use crate::domain::backtest::Ledger;
use crate::domain::error::SigtraderError;

/// Port for persisting completed ledgers.
///
/// Both methods return the written location, or `None` when there was
/// nothing to write.
pub trait LedgerPort {
    fn write_ledger(&self, ledger: &Ledger) -> Result<Option<PathBuf>, SigtraderError>;

    fn write_summary(&self, ledgers: &[Ledger]) -> Result<Option<PathBuf>, SigtraderError>;
}
