//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::adapters::binance_adapter::BinanceDataAdapter;
use crate::adapters::console_report_adapter::ConsoleReportAdapter;
use crate::adapters::csv_adapter::{self, CsvDataAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_state_adapter::JsonStateAdapter;
use crate::domain::backtest;
use crate::domain::config::{PaperConfig, StrategyConfig};
use crate::domain::config_validation::{validate_paper_config, validate_strategy_config};
use crate::domain::error::CryptraderError;
use crate::live::PaperTrader;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "cryptrader", about = "Leveraged crypto strategy backtester and paper trader")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a candle CSV
    Backtest {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        capital: Option<f64>,
    },
    /// Run the live paper-trading loop
    Paper {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Stop after this many polling cycles (default: run until killed)
        #[arg(long)]
        iterations: Option<u64>,
        /// State file override
        #[arg(long)]
        state: Option<String>,
    },
    /// Fetch candles from Binance into a CSV
    Fetch {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        /// Days of history to fetch
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            data,
            config,
            symbol,
            capital,
        } => run_backtest(&data, config.as_ref(), symbol.as_deref(), capital),
        Command::Paper {
            config,
            iterations,
            state,
        } => run_paper(config.as_ref(), iterations, state.as_deref()),
        Command::Fetch {
            output,
            config,
            symbol,
            days,
        } => run_fetch(&output, config.as_ref(), symbol.as_deref(), days),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Config-file values over defaults, then flag overrides, then validation.
fn resolve_strategy_config(
    config_path: Option<&PathBuf>,
    symbol_override: Option<&str>,
    capital_override: Option<f64>,
) -> Result<StrategyConfig, ExitCode> {
    let mut config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = load_config(path)?;
            StrategyConfig::from_config(&adapter)
        }
        None => StrategyConfig::default(),
    };

    if let Some(symbol) = symbol_override {
        config.symbol = symbol.to_uppercase();
    }
    if let Some(capital) = capital_override {
        config.initial_capital = capital;
    }

    if let Err(e) = validate_strategy_config(&config) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(config)
}

fn run_backtest(
    data_path: &PathBuf,
    config_path: Option<&PathBuf>,
    symbol_override: Option<&str>,
    capital_override: Option<f64>,
) -> ExitCode {
    // Stage 1: Resolve config
    let config = match resolve_strategy_config(config_path, symbol_override, capital_override) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // Stage 2: Load candles
    eprintln!("Loading candles from {}", data_path.display());
    let adapter = CsvDataAdapter::new(data_path.clone());
    let candles = match adapter.fetch_candles(&config.symbol, &config.interval) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Running backtest: {} candles, {} {} at {}x leverage",
        candles.len(),
        config.symbol,
        config.interval,
        config.leverage
    );

    // Stage 3: Run and summarize
    let report = ConsoleReportAdapter;
    let result = match backtest::run_backtest(&candles, &config, &report) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    report.backtest_summary(&result);
    ExitCode::SUCCESS
}

fn run_paper(
    config_path: Option<&PathBuf>,
    iterations: Option<u64>,
    state_override: Option<&str>,
) -> ExitCode {
    // Stage 1: Resolve configs
    let (config, mut paper) = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            (
                StrategyConfig::from_config(&adapter),
                PaperConfig::from_config(&adapter),
            )
        }
        None => (StrategyConfig::default(), PaperConfig::default()),
    };
    if let Some(state_file) = state_override {
        paper.state_file = state_file.to_string();
    }
    if let Err(e) = validate_strategy_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_paper_config(&paper) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Wire adapters
    let data = BinanceDataAdapter::new(30);
    let state = JsonStateAdapter::new(&paper.state_file);
    let report = ConsoleReportAdapter;

    eprintln!(
        "Starting paper trading: {} {} at {}x leverage",
        config.symbol, config.interval, config.leverage
    );
    eprintln!(
        "Poll interval: {}s | Lookback: {} candles | State file: {}",
        paper.poll_interval_secs, paper.lookback, paper.state_file
    );

    // Stage 3: Run the polling loop
    let stop = Arc::new(AtomicBool::new(false));
    let mut trader = match PaperTrader::new(config, paper, &data, &state, &report, stop) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    match trader.run(iterations) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_fetch(
    output_path: &PathBuf,
    config_path: Option<&PathBuf>,
    symbol_override: Option<&str>,
    days: u32,
) -> ExitCode {
    // Stage 1: Resolve config
    let config = match resolve_strategy_config(config_path, symbol_override, None) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // Stage 2: Fetch from Binance
    eprintln!(
        "Fetching {} days of {} candles for {}...",
        days, config.interval, config.symbol
    );
    let adapter = BinanceDataAdapter::new(days);
    let candles = match adapter.fetch_candles(&config.symbol, &config.interval) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if candles.is_empty() {
        let e = CryptraderError::NoData {
            symbol: config.symbol.clone(),
        };
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!(
        "Fetched {} candles from {} to {}",
        candles.len(),
        candles[0].timestamp,
        candles[candles.len() - 1].timestamp
    );

    // Stage 3: Write the CSV
    match csv_adapter::write_candles(output_path, &candles) {
        Ok(()) => {
            eprintln!("Candles written to {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
