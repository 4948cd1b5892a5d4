//! CSV trade ledger writer.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::backtest::Ledger;
use crate::domain::error::SigtraderError;
use crate::domain::position::ClosedTrade;
use crate::ports::ledger_port::LedgerPort;

pub const SUMMARY_FILE: &str = "all_trades_summary.csv";

const HEADER: [&str; 11] = [
    "symbol",
    "entry_date",
    "entry_price",
    "shares",
    "stop_loss_price",
    "exit_date",
    "exit_price",
    "pnl",
    "return_pct",
    "holding_days",
    "close_reason",
];

pub struct CsvLedgerAdapter {
    output_dir: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn ledger_path(&self, symbol: &str) -> PathBuf {
        self.output_dir.join(format!("{}_trades.csv", symbol))
    }

    fn write_trades<'a>(
        &self,
        path: &Path,
        trades: impl Iterator<Item = &'a ClosedTrade>,
    ) -> Result<(), SigtraderError> {
        fs::create_dir_all(&self.output_dir)?;
        let report_err = |e: csv::Error| SigtraderError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        };

        let mut writer = csv::Writer::from_path(path).map_err(report_err)?;
        writer.write_record(HEADER).map_err(report_err)?;
        for trade in trades {
            writer.write_record(trade_record(trade)).map_err(report_err)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn trade_record(trade: &ClosedTrade) -> [String; 11] {
    [
        trade.symbol.clone(),
        trade.entry_date.format("%Y-%m-%d").to_string(),
        trade.entry_price.to_string(),
        trade.shares.to_string(),
        trade.stop_loss_price.to_string(),
        trade.exit_date.format("%Y-%m-%d").to_string(),
        trade.exit_price.to_string(),
        trade.pnl.to_string(),
        trade.return_pct.to_string(),
        trade.holding_days.to_string(),
        trade.close_reason.to_string(),
    ]
}

impl LedgerPort for CsvLedgerAdapter {
    fn write_ledger(&self, ledger: &Ledger) -> Result<Option<PathBuf>, SigtraderError> {
        if ledger.is_empty() {
            return Ok(None);
        }
        let path = self.ledger_path(&ledger.symbol);
        self.write_trades(&path, ledger.trades.iter())?;
        Ok(Some(path))
    }

    fn write_summary(&self, ledgers: &[Ledger]) -> Result<Option<PathBuf>, SigtraderError> {
        if ledgers.iter().all(Ledger::is_empty) {
            return Ok(None);
        }
        let path = self.output_dir.join(SUMMARY_FILE);
        self.write_trades(&path, ledgers.iter().flat_map(|l| l.trades.iter()))?;
        Ok(Some(path))
    }
}
