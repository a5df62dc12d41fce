//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_recorder::{CsvRecorder, TraceRecorder};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_broker::PaperBroker;
use crate::adapters::replay_market::ReplayMarket;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config::StrategyConfig;
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::SmacrossError;
use crate::domain::strategy::CrossoverStrategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::metrics_port::MetricsRecorder;

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "Moving-average crossover strategy runner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay minute bars through the strategy
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [backtest] data_dir
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Write per-tick metrics as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            data,
            output,
        } => run_replay(&config, data.as_deref(), output.as_deref()).map(|result| {
            print_summary(&result);
        }),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SmacrossError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SmacrossError> {
    validate_backtest_config(adapter)?;
    let defaults = BacktestConfig::default();
    Ok(BacktestConfig {
        initial_capital: adapter.get_double(
            "backtest",
            "initial_capital",
            defaults.initial_capital,
        ),
        commission_pct: adapter.get_double("backtest", "commission_pct", defaults.commission_pct),
        slippage_pct: adapter.get_double("backtest", "slippage_pct", defaults.slippage_pct),
        fill_delay: adapter.get_int("backtest", "fill_delay", defaults.fill_delay as i64) as u32,
    })
}

pub fn build_strategy_config(adapter: &dyn ConfigPort) -> Result<StrategyConfig, SmacrossError> {
    validate_strategy_config(adapter)?;
    StrategyConfig::from_port(adapter)
}

/// `--data` wins over `[backtest] data_dir`.
pub fn resolve_data_dir(
    adapter: &dyn ConfigPort,
    data_override: Option<&Path>,
) -> Result<PathBuf, SmacrossError> {
    if let Some(dir) = data_override {
        return Ok(dir.to_path_buf());
    }
    adapter
        .get_string("backtest", "data_dir")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| SmacrossError::ConfigMissing {
            section: "backtest".into(),
            key: "data_dir".into(),
        })
}

pub fn run_replay(
    config_path: &Path,
    data_override: Option<&Path>,
    output_path: Option<&Path>,
) -> Result<BacktestResult, SmacrossError> {
    let adapter = load_config(config_path)?;
    let strategy_config = build_strategy_config(&adapter)?;
    let data_dir = resolve_data_dir(&adapter, data_override)?;
    let bt_config = build_backtest_config(&adapter)?;

    let csv = CsvAdapter::new(data_dir);
    let market = ReplayMarket::from_csv(&csv, &[strategy_config.pair.as_str()]).inspect_err(
        |e| {
            if let (SmacrossError::UnknownPair { pair }, Ok(available)) = (e, csv.list_pairs()) {
                warn!(pair = %pair, ?available, "no bar file for pair");
            }
        },
    )?;
    info!(pair = %strategy_config.pair, bars = market.len(), "loaded minute bars");

    match output_path {
        Some(path) => {
            let mut recorder = CsvRecorder::create(path)?;
            let result = execute(strategy_config, market, &bt_config, &mut recorder)?;
            recorder.flush()?;
            info!(path = %path.display(), "metrics written");
            Ok(result)
        }
        None => {
            let mut recorder = TraceRecorder::new();
            execute(strategy_config, market, &bt_config, &mut recorder)
        }
    }
}

pub fn execute(
    strategy_config: StrategyConfig,
    mut market: ReplayMarket,
    bt_config: &BacktestConfig,
    recorder: &mut dyn MetricsRecorder,
) -> Result<BacktestResult, SmacrossError> {
    let mut strategy = CrossoverStrategy::initialize(strategy_config, &market)?;
    let mut broker = PaperBroker::new(bt_config);
    let mut result =
        backtest_engine::run_backtest(&mut strategy, &mut market, &mut broker, recorder);
    result.max_drawdown = broker.portfolio().max_drawdown();
    Ok(result)
}

fn print_summary(result: &BacktestResult) {
    eprintln!("\n=== Run Summary ===");
    eprintln!("Ticks:            {}", result.ticks);
    eprintln!("Orders issued:    {}", result.orders.len());
    eprintln!("Fills:            {}", result.fills.len());
    eprintln!("Final cash:       {:.2}", result.final_cash);
    eprintln!("Final position:   {:.6}", result.final_position);
    eprintln!("Final equity:     {:.2}", result.final_equity);
    eprintln!("Total return:     {:.2}%", result.total_return * 100.0);
    eprintln!("Max drawdown:     {:.2}%", result.max_drawdown * 100.0);
    if result.recording_failures > 0 {
        eprintln!("Recording errors: {}", result.recording_failures);
    }
}

pub fn run_validate(config_path: &Path) -> Result<(), SmacrossError> {
    let adapter = load_config(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    build_backtest_config(&adapter)?;
    resolve_data_dir(&adapter, None)?;
    eprintln!(
        "Config OK: {} short={} long={}",
        strategy.pair, strategy.short_window, strategy.long_window
    );
    Ok(())
}
