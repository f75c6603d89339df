//! Configuration file support for backtest runs.
//!
//! Allows loading run configurations from TOML files for reproducibility.

use crate::error::{BacktestError, Result};
use crate::optimizer::OptimizerConfig;
use crate::strategies::{MeanReversion, MomentumCrossover};
use crate::strategy::Strategy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Complete run configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunFileConfig {
    /// Data settings.
    #[serde(default)]
    pub data: DataSettings,
    /// Strategy settings.
    #[serde(default)]
    pub strategy: StrategySettings,
    /// Report settings.
    #[serde(default)]
    pub report: ReportSettings,
    /// Optimizer settings.
    #[serde(default)]
    pub optimizer: OptimizerSettings,
}

/// Data settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSettings {
    /// Path to the wide CSV of adjusted closes.
    pub path: Option<String>,
    /// Date format in the CSV.
    pub date_format: Option<String>,
}

/// Strategy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Strategy kind: "momentum" or "mean-reversion".
    #[serde(default = "default_kind")]
    pub kind: String,
    /// RSI period (momentum).
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    /// Fast EMA period (momentum).
    #[serde(default = "default_fast_period")]
    pub fast_period: usize,
    /// Slow EMA period (momentum).
    #[serde(default = "default_slow_period")]
    pub slow_period: usize,
    /// SMA period (mean reversion).
    #[serde(default = "default_sma_period")]
    pub sma_period: usize,
    /// Band width as a fraction of the SMA (mean reversion).
    #[serde(default = "default_band")]
    pub band: f64,
    /// Linear trend window (mean reversion).
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
}

fn default_kind() -> String {
    "momentum".to_string()
}
fn default_rsi_period() -> usize {
    14
}
fn default_fast_period() -> usize {
    10
}
fn default_slow_period() -> usize {
    20
}
fn default_sma_period() -> usize {
    20
}
fn default_band() -> f64 {
    0.05
}
fn default_trend_window() -> usize {
    5
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            rsi_period: default_rsi_period(),
            fast_period: default_fast_period(),
            slow_period: default_slow_period(),
            sma_period: default_sma_period(),
            band: default_band(),
            trend_window: default_trend_window(),
        }
    }
}

impl StrategySettings {
    /// Build the configured strategy.
    pub fn build(&self) -> Result<Box<dyn Strategy>> {
        match self.kind.as_str() {
            "momentum" => Ok(Box::new(MomentumCrossover::new(
                self.rsi_period,
                self.fast_period,
                self.slow_period,
            ))),
            "mean-reversion" => {
                let band = Decimal::try_from(self.band).map_err(|_| {
                    BacktestError::ConfigError(format!("invalid band: {}", self.band))
                })?;
                Ok(Box::new(MeanReversion::new(
                    self.sma_period,
                    band,
                    self.trend_window,
                )))
            }
            other => Err(BacktestError::ConfigError(format!(
                "unknown strategy kind: {other} (expected \"momentum\" or \"mean-reversion\")"
            ))),
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Initial capital for the compounding value path.
    #[serde(default = "default_capital")]
    pub initial_capital: f64,
    /// Daily risk-free rate for Sharpe/Sortino.
    #[serde(default = "default_risk_free")]
    pub daily_risk_free_rate: f64,
}

fn default_capital() -> f64 {
    100_000.0
}
fn default_risk_free() -> f64 {
    0.0001
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            initial_capital: default_capital(),
            daily_risk_free_rate: default_risk_free(),
        }
    }
}

/// Optimizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerSettings {
    /// Number of Monte Carlo trials.
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Random seed; omit for OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Daily risk-free rate for the per-trial Sharpe ratio.
    #[serde(default = "default_risk_free")]
    pub daily_risk_free_rate: f64,
}

fn default_trials() -> usize {
    100
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            seed: None,
            daily_risk_free_rate: default_risk_free(),
        }
    }
}

impl From<&OptimizerSettings> for OptimizerConfig {
    fn from(settings: &OptimizerSettings) -> Self {
        Self {
            num_trials: settings.trials,
            daily_risk_free_rate: settings.daily_risk_free_rate,
            seed: settings.seed,
        }
    }
}

impl RunFileConfig {
    /// Load a run configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        info!(path = %path.display(), "loaded run configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: RunFileConfig = toml::from_str("").unwrap();
        assert_eq!(config.strategy.kind, "momentum");
        assert_eq!(config.strategy.rsi_period, 14);
        assert_eq!(config.optimizer.trials, 100);
        assert_eq!(config.report.initial_capital, 100_000.0);
        assert!(config.optimizer.seed.is_none());
    }

    #[test]
    fn partial_toml_overrides_selected_fields() {
        let toml_str = r#"
[strategy]
kind = "mean-reversion"
sma_period = 30

[optimizer]
trials = 500
seed = 42
"#;
        let config: RunFileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.strategy.kind, "mean-reversion");
        assert_eq!(config.strategy.sma_period, 30);
        // Untouched fields keep their defaults.
        assert_eq!(config.strategy.trend_window, 5);
        assert_eq!(config.optimizer.trials, 500);
        assert_eq!(config.optimizer.seed, Some(42));

        let optimizer_config = OptimizerConfig::from(&config.optimizer);
        assert_eq!(optimizer_config.num_trials, 500);
        assert_eq!(optimizer_config.seed, Some(42));
    }

    #[test]
    fn builds_both_strategy_kinds() {
        let settings = StrategySettings::default();
        assert_eq!(settings.build().unwrap().name(), "Momentum Crossover");

        let settings = StrategySettings {
            kind: "mean-reversion".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.build().unwrap().name(), "Mean Reversion");

        let settings = StrategySettings {
            kind: "nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.build(),
            Err(BacktestError::ConfigError(_))
        ));
    }
}
