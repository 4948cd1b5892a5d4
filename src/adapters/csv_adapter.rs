//! CSV file data adapter for signal-annotated bars.
//!
//! One file per symbol, `<CODE>.csv`, with header
//! `date,open,high,low,close,volume,buy_signal,sell_signal`.

use crate::domain::bar::SignalBar;
use crate::domain::error::SigtraderError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const EXTENSION: &str = ".csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", code, EXTENSION))
    }
}

fn column<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str, SigtraderError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| SigtraderError::Data {
            reason: format!("missing {} column", name),
        })
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, SigtraderError> {
    column(record, index, name)?
        .parse()
        .map_err(|e| SigtraderError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_flag(value: &str, name: &str) -> Result<bool, SigtraderError> {
    match value.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(SigtraderError::Data {
            reason: format!("invalid {} value: {}", name, other),
        }),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<SignalBar>, SigtraderError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| SigtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SigtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = column(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SigtraderError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if start_date.is_some_and(|start| date < start)
                || end_date.is_some_and(|end| date > end)
            {
                continue;
            }

            let volume: i64 = column(&record, 5, "volume")?
                .parse()
                .map_err(|e| SigtraderError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(SignalBar {
                code: code.to_string(),
                date,
                open: parse_price(&record, 1, "open")?,
                high: parse_price(&record, 2, "high")?,
                low: parse_price(&record, 3, "low")?,
                close: parse_price(&record, 4, "close")?,
                volume,
                buy_signal: parse_flag(column(&record, 6, "buy_signal")?, "buy_signal")?,
                sell_signal: parse_flag(column(&record, 7, "sell_signal")?, "sell_signal")?,
            });
        }

        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SigtraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SigtraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| SigtraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(EXTENSION) {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume,buy_signal,sell_signal\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000,True,False\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000,false,false\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000,0,1\n";

        fs::write(path.join("SBIN.NS.csv"), csv_content).unwrap();
        fs::write(
            path.join("HINDALCO.NS.csv"),
            "date,open,high,low,close,volume,buy_signal,sell_signal\n",
        )
        .unwrap();
        fs::write(path.join("notes.txt"), "not a bar file").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_bars_returns_correct_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("SBIN.NS", None, None).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].code, "SBIN.NS");
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
        assert!(bars[0].buy_signal);
        assert!(!bars[0].sell_signal);
        assert!(!bars[1].buy_signal);
        assert!(bars[2].sell_signal);
    }

    #[test]
    fn fetch_bars_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let day = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let bars = adapter.fetch_bars("SBIN.NS", Some(day), Some(day)).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, day);

        let bars = adapter.fetch_bars("SBIN.NS", Some(day), None).unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn fetch_bars_keeps_file_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("X.csv"),
            "date,open,high,low,close,volume,buy_signal,sell_signal\n\
             2024-01-02,1,1,1,1,1,false,false\n\
             2024-01-01,1,1,1,1,1,false,false\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let bars = adapter.fetch_bars("X", None, None).unwrap();
        assert!(bars[0].date > bars[1].date);
    }

    #[test]
    fn fetch_bars_rejects_bad_flag() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("X.csv"),
            "date,open,high,low,close,volume,buy_signal,sell_signal\n\
             2024-01-01,1,1,1,1,1,maybe,false\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.fetch_bars("X", None, None).unwrap_err();
        assert!(err.to_string().contains("buy_signal"));
    }

    #[test]
    fn fetch_bars_errors_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_bars("XYZ", None, None);
        assert!(matches!(result, Err(SigtraderError::Data { .. })));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["HINDALCO.NS", "SBIN.NS"]);
    }
}
