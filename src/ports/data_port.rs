//! Signal-annotated bar source port.

use crate::domain::bar::SignalBar;
use crate::domain::error::SigtraderError;
use chrono::NaiveDate;

/// Symbols are fetched concurrently, so implementations must be shareable
/// across threads.
pub trait DataPort: Send + Sync {
    /// Bars for `code` in source order, limited to the inclusive date range
    /// when bounds are given.
    fn fetch_bars(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<SignalBar>, SigtraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, SigtraderError>;
}
