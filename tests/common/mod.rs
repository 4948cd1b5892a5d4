#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use sigtrader::domain::bar::SignalBar;
use sigtrader::domain::error::SigtraderError;
use sigtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<SignalBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<SignalBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<SignalBar>, SigtraderError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(SigtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| start_date.is_none_or(|start| b.date >= start))
                    .filter(|b| end_date.is_none_or(|end| b.date <= end))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SigtraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_bar(code: &str, date: NaiveDate, close: f64, buy: bool, sell: bool) -> SignalBar {
    SignalBar {
        code: code.to_string(),
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000,
        buy_signal: buy,
        sell_signal: sell,
    }
}

/// Consecutive daily bars from 2024-01-01, one per `(close, buy, sell)`.
pub fn make_series(code: &str, specs: &[(f64, bool, bool)]) -> Vec<SignalBar> {
    let start = date(2024, 1, 1);
    specs
        .iter()
        .enumerate()
        .map(|(i, &(close, buy, sell))| {
            make_bar(code, start + Duration::days(i as i64), close, buy, sell)
        })
        .collect()
}

/// `n` flat bars at `close` with no signals.
pub fn quiet_series(code: &str, n: usize, close: f64) -> Vec<SignalBar> {
    make_series(code, &vec![(close, false, false); n])
}

/// Write bars as a `<CODE>.csv` file in the layout the CSV adapter reads.
pub fn write_bar_csv(dir: &std::path::Path, code: &str, bars: &[SignalBar]) {
    let mut content = String::from("date,open,high,low,close,volume,buy_signal,sell_signal\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
            bar.buy_signal,
            bar.sell_signal
        ));
    }
    std::fs::write(dir.join(format!("{code}.csv")), content).unwrap();
}
