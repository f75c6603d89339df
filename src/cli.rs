//! Command-line interface for the backtest engine.

use krill::backtest::run_backtest;
use krill::config::RunFileConfig;
use krill::data::{load_wide_csv, DataConfig};
use krill::error::{BacktestError, Result};
use krill::optimizer::{optimize, OptimizerConfig};
use krill::report::ResultFormatter;
use krill::strategies::{MeanReversion, MomentumCrossover};
use krill::strategy::Strategy;
use rust_decimal::Decimal;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Krill - a rule-based equity backtesting engine.
#[derive(Parser)]
#[command(name = "krill")]
#[command(version)]
#[command(about = "Backtest rule-based trading strategies over daily price series")]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a backtest with a built-in strategy
    Run {
        /// Path to a wide CSV of adjusted closes (date,TICK1,TICK2,...)
        #[arg(short, long, conflicts_with = "config")]
        data: Option<PathBuf>,

        /// Path to a TOML run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Strategy to use
        #[arg(short = 'S', long, value_enum, default_value = "momentum")]
        strategy: StrategyType,

        /// Initial capital
        #[arg(long, default_value = "100000")]
        capital: f64,

        /// Daily risk-free rate
        #[arg(long, default_value = "0.0001")]
        risk_free: f64,

        /// RSI period (momentum)
        #[arg(long, default_value = "14")]
        rsi_period: usize,

        /// Fast EMA period (momentum)
        #[arg(long, default_value = "10")]
        fast_period: usize,

        /// Slow EMA period (momentum)
        #[arg(long, default_value = "20")]
        slow_period: usize,

        /// SMA period (mean reversion)
        #[arg(long, default_value = "20")]
        sma_period: usize,

        /// Band width as a fraction of the SMA (mean reversion)
        #[arg(long, default_value = "0.05")]
        band: f64,

        /// Linear trend window (mean reversion)
        #[arg(long, default_value = "5")]
        trend_window: usize,
    },

    /// Search for the best portfolio weights by Monte Carlo simulation
    Optimize {
        /// Path to a wide CSV of adjusted closes
        #[arg(short, long)]
        data: PathBuf,

        /// Number of random weight vectors to try
        #[arg(short, long, default_value = "100")]
        trials: usize,

        /// Random seed for reproducible trials
        #[arg(short, long)]
        seed: Option<u64>,

        /// Daily risk-free rate
        #[arg(long, default_value = "0.0001")]
        risk_free: f64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyType {
    Momentum,
    MeanReversion,
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            data,
            config,
            strategy,
            capital,
            risk_free,
            rsi_period,
            fast_period,
            slow_period,
            sma_period,
            band,
            trend_window,
        } => {
            let (series, strategy_box, capital, risk_free) = if let Some(config_path) = config {
                let file_config = RunFileConfig::load(config_path)?;
                let data_path = file_config.data.path.clone().ok_or_else(|| {
                    BacktestError::ConfigError("run configuration has no data.path".to_string())
                })?;
                let data_config = DataConfig {
                    date_format: file_config.data.date_format.clone(),
                    ..Default::default()
                };
                let series = load_wide_csv(data_path, &data_config)?;
                let strategy_box = file_config.strategy.build()?;
                (
                    series,
                    strategy_box,
                    file_config.report.initial_capital,
                    file_config.report.daily_risk_free_rate,
                )
            } else {
                let data_path = data.ok_or_else(|| {
                    BacktestError::ConfigError("either --data or --config is required".to_string())
                })?;
                let series = load_wide_csv(data_path, &DataConfig::default())?;
                let strategy_box: Box<dyn Strategy> = match strategy {
                    StrategyType::Momentum => Box::new(MomentumCrossover::new(
                        rsi_period,
                        fast_period,
                        slow_period,
                    )),
                    StrategyType::MeanReversion => {
                        let band = Decimal::try_from(band).map_err(|_| {
                            BacktestError::ConfigError(format!("invalid band: {band}"))
                        })?;
                        Box::new(MeanReversion::new(sma_period, band, trend_window))
                    }
                };
                (series, strategy_box, capital, risk_free)
            };

            let summary = run_backtest(&series, strategy_box.as_ref(), risk_free, capital)?;
            match cli.output {
                OutputFormat::Text => ResultFormatter::print_backtest(&summary),
                OutputFormat::Json => println!("{}", ResultFormatter::backtest_json(&summary)?),
            }
            Ok(())
        }

        Commands::Optimize {
            data,
            trials,
            seed,
            risk_free,
        } => {
            let series = load_wide_csv(data, &DataConfig::default())?;
            let config = OptimizerConfig {
                num_trials: trials,
                daily_risk_free_rate: risk_free,
                seed,
            };
            let result = optimize(&series, &config)?;
            match cli.output {
                OutputFormat::Text => ResultFormatter::print_optimization(&result),
                OutputFormat::Json => {
                    println!("{}", ResultFormatter::optimization_json(&result)?)
                }
            }
            Ok(())
        }
    }
}
