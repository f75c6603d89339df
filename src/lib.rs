//! Krill - a rule-based equity backtesting engine.
//!
//! # Overview
//!
//! Krill backtests simple rule-based trading strategies over historical
//! daily price series and reports risk-adjusted performance:
//!
//! - **Indicators**: SMA, EMA, and RSI as full-series decimal calculators
//! - **Strategies**: momentum (RSI/EMA crossover) and mean reversion
//!   (SMA band with a linear-trend price prediction)
//! - **Portfolio optimization**: seedable Monte Carlo weight search scored
//!   by realized Sharpe ratio
//! - **Performance metrics**: compounded returns, Sharpe, Sortino, max
//!   drawdown, and win rate
//!
//! Everything runs sequentially and is deterministic given identical
//! inputs and seed.
//!
//! # Quick Start
//!
//! ```no_run
//! use krill::backtest::{run_backtest, DEFAULT_INITIAL_CAPITAL};
//! use krill::data::{load_wide_csv, DataConfig};
//! use krill::strategies::MomentumCrossover;
//!
//! let series = load_wide_csv("stock_data.csv", &DataConfig::default()).unwrap();
//! let strategy = MomentumCrossover::default_params();
//! let summary = run_backtest(&series, &strategy, 0.0001, DEFAULT_INITIAL_CAPITAL).unwrap();
//!
//! println!("Sharpe: {:.2}", summary.report.sharpe_ratio);
//! println!("Win rate: {:.2}%", summary.report.win_rate * 100.0);
//! ```
//!
//! # Creating Custom Strategies
//!
//! Implement the [`strategy::Strategy`] trait: one [`types::Signal`] per
//! input day, flat during warm-up.
//!
//! # Modules
//!
//! - [`types`]: core data types (PriceBar, PriceSeries, WeightVector)
//! - [`data`]: wide-CSV price loading
//! - [`indicators`]: SMA, EMA, RSI
//! - [`trend`]: least-squares linear trend extrapolation
//! - [`strategy`]: the Strategy trait
//! - [`strategies`]: built-in strategies
//! - [`backtest`]: basket driver producing daily portfolio returns
//! - [`optimizer`]: Monte Carlo weight search
//! - [`metrics`]: performance evaluation
//! - [`report`]: console formatting
//! - [`config`]: TOML run configuration

pub mod backtest;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod optimizer;
pub mod report;
pub mod strategies;
pub mod strategy;
pub mod trend;
pub mod types;

// Re-exports for convenience
pub use backtest::{run_backtest, run_strategy, BacktestSummary, SIGNAL_RETURN};
pub use config::RunFileConfig;
pub use data::{load_wide_csv, read_wide_csv, DataConfig};
pub use error::{BacktestError, Result};
pub use indicators::{Ema, Rsi, Sma};
pub use metrics::{
    annualized_return, cumulative_return, max_drawdown, portfolio_values, sharpe_ratio,
    sortino_ratio, win_rate, RiskReport,
};
pub use optimizer::{optimize, OptimizationResult, OptimizerConfig};
pub use report::ResultFormatter;
pub use strategy::Strategy;
pub use trend::LinearTrend;
pub use types::{PortfolioMetrics, PriceBar, PriceSeries, Signal, WeightVector};
