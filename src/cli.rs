//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::log_event_adapter::LogEventAdapter;
use crate::domain::backtest::DEFAULT_INITIAL_CAPITAL;
use crate::domain::bar::signal_counts;
use crate::domain::batch::{run_batch, BatchConfig, BatchResult};
use crate::domain::config_validation::{parse_date, validate_backtest_config};
use crate::domain::error::SigtraderError;
use crate::domain::metrics::TradeSummary;
use crate::domain::universe::{
    parse_codes, UniverseError, MIN_HISTORY_BARS, MIN_WINDOW_BARS, WINDOW_FRACTION,
};
use crate::domain::validation::validate_bars;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::ledger_port::LedgerPort;

const DEFAULT_OUTPUT_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Signal-driven single-position backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest every configured symbol and write trade ledgers
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated codes, overriding [backtest] codes
        #[arg(long)]
        code: Option<String>,
        /// Ledger directory, overriding [output] directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Validate config and list the symbols without running
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show bar count, date range and signal counts for one symbol
    Info {
        #[arg(long)]
        code: String,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            code,
            output,
            dry_run,
        } => run_backtest(&config, code.as_deref(), output.as_deref(), dry_run),
        Command::Validate { config } => run_validate(&config),
        Command::Info { code, config } => run_info(&code, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SigtraderError> {
    FileConfigAdapter::from_file(path).map_err(|e| SigtraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn data_directory(adapter: &dyn ConfigPort) -> Result<PathBuf, SigtraderError> {
    adapter
        .get_path("data", "directory")
        .ok_or_else(|| SigtraderError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })
}

fn run_backtest(
    config_path: &Path,
    code_override: Option<&str>,
    output_override: Option<&Path>,
    dry_run: bool,
) -> Result<(), SigtraderError> {
    // Stage 1: Load and validate config
    info!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    let batch_config = build_batch_config(&adapter)?;

    // Stage 2: Resolve symbols
    let data_port = CsvAdapter::new(data_directory(&adapter)?);
    let codes = resolve_codes(code_override, &adapter, &data_port)?;
    info!("Processing {} symbols: {}", codes.len(), codes.join(", "));

    if dry_run {
        info!(
            "Dry run: capital {:.2}, min bars {}, window max({}, {:.0}%)",
            batch_config.initial_capital,
            batch_config.min_bars,
            batch_config.min_window,
            batch_config.window_fraction * 100.0
        );
        return Ok(());
    }

    // Stage 3: Backtest and persist
    let output_dir = output_override
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_path("output", "directory"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let ledger_port = CsvLedgerAdapter::new(output_dir);
    let per_symbol = adapter.get_bool("output", "per_symbol", true);

    run_backtest_pipeline(&data_port, &ledger_port, &codes, &batch_config, per_symbol)?;
    Ok(())
}

pub fn build_batch_config(adapter: &dyn ConfigPort) -> Result<BatchConfig, SigtraderError> {
    let start_date = parse_date(
        adapter.get_string("backtest", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = parse_date(
        adapter.get_string("backtest", "end_date").as_deref(),
        "end_date",
    )?;

    let count = |key: &str, default: usize| -> Result<usize, SigtraderError> {
        usize::try_from(adapter.get_int("backtest", key, default as i64)).map_err(|_| {
            SigtraderError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: format!("{key} must be non-negative"),
            }
        })
    };

    Ok(BatchConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        start_date,
        end_date,
        min_bars: count("min_bars", MIN_HISTORY_BARS)?,
        min_window: count("min_window", MIN_WINDOW_BARS)?,
        window_fraction: adapter.get_double("backtest", "window_fraction", WINDOW_FRACTION),
    })
}

/// `--code` wins over `[backtest] codes`; with neither, every symbol the
/// data source holds is used.
pub fn resolve_codes(
    code_override: Option<&str>,
    adapter: &dyn ConfigPort,
    data_port: &dyn DataPort,
) -> Result<Vec<String>, SigtraderError> {
    let configured = code_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("backtest", "codes"));

    let codes = match configured {
        Some(list) => parse_codes(&list)?,
        None => data_port.list_symbols()?,
    };

    if codes.is_empty() {
        return Err(UniverseError::NoCodes.into());
    }
    Ok(codes)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    ledger_port: &dyn LedgerPort,
    codes: &[String],
    config: &BatchConfig,
    per_symbol: bool,
) -> Result<BatchResult, SigtraderError> {
    let result = run_batch(data_port, codes, config, LogEventAdapter::new);

    if result.ledgers.is_empty() {
        return Err(UniverseError::AllCodesSkipped.into());
    }

    for ledger in &result.ledgers {
        if ledger.is_empty() {
            warn!("No trades executed for {}", ledger.symbol);
            continue;
        }

        let summary = TradeSummary::compute(&ledger.trades);
        info!(
            "{}: {} trades | Win Rate: {:.2}% | Avg Return: {:.2}% | P&L: {:.2}",
            ledger.symbol,
            summary.total_trades,
            summary.win_rate * 100.0,
            summary.avg_return_pct,
            summary.total_pnl
        );

        if per_symbol {
            if let Some(path) = ledger_port.write_ledger(ledger)? {
                info!("Saved {} trades to {}", ledger.trades.len(), path.display());
            }
        }
    }

    let overall = TradeSummary::across(&result.ledgers);
    match ledger_port.write_summary(&result.ledgers)? {
        Some(path) => info!(
            "Saved {} trades to {} | Win Rate: {:.2}% | Avg Return: {:.2}% | Total P&L: {:.2}",
            overall.total_trades,
            path.display(),
            overall.win_rate * 100.0,
            overall.avg_return_pct,
            overall.total_pnl
        ),
        None => warn!("No trades executed"),
    }

    info!(
        "Completed {} of {} symbols ({} skipped)",
        result.ledgers.len(),
        codes.len(),
        result.skipped.len()
    );

    Ok(result)
}

fn run_validate(config_path: &Path) -> Result<(), SigtraderError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    let config = build_batch_config(&adapter)?;
    info!(
        "Config {} is valid (initial capital {:.2})",
        config_path.display(),
        config.initial_capital
    );
    Ok(())
}

fn run_info(code: &str, config_path: &Path) -> Result<(), SigtraderError> {
    let adapter = load_config(config_path)?;
    let data_port = CsvAdapter::new(data_directory(&adapter)?);
    let code = code.trim().to_uppercase();

    let bars = data_port.fetch_bars(&code, None, None)?;
    let (first, last) = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            println!("{code}: no data");
            return Ok(());
        }
    };

    let (buys, sells) = signal_counts(&bars);
    println!("Code:         {code}");
    println!("Bars:         {}", bars.len());
    println!("Date range:   {} to {}", first.date, last.date);
    println!("Buy signals:  {buys}");
    println!("Sell signals: {sells}");
    match validate_bars(&bars) {
        Ok(()) => println!("Validation:   ok"),
        Err(e) => println!("Validation:   {e}"),
    }
    Ok(())
}
