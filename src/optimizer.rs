//! Monte Carlo portfolio-weight search.
//!
//! Draws random weight vectors, scores each by the realized Sharpe ratio
//! of the weighted daily-return series, and keeps the best. The search is
//! an explicit fold over trials: each trial is a pure function of the RNG
//! stream, and the accumulator holds only the best trial seen so far.

use crate::error::{BacktestError, Result};
use crate::indicators::div;
use crate::types::{PortfolioMetrics, PriceSeries, WeightVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Configuration for the Monte Carlo weight search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Number of random weight vectors to try.
    pub num_trials: usize,
    /// Daily risk-free rate used in the per-trial Sharpe ratio.
    pub daily_risk_free_rate: f64,
    /// Random seed for reproducibility (None seeds from OS entropy).
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            num_trials: 100,
            daily_risk_free_rate: 0.0001,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    /// Set the random seed for reproducible trials.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the trial count.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.num_trials = trials;
        self
    }
}

/// Winning trial of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Tickers in the fixed order the weights apply to.
    pub tickers: Vec<String>,
    pub weights: WeightVector,
    pub metrics: PortfolioMetrics,
    pub trials: usize,
}

/// Search random weight vectors for the greatest realized Sharpe ratio.
///
/// The first trial seeds the best-so-far accumulator; later trials replace
/// it only on a strictly greater Sharpe ratio, so ties keep the earlier
/// trial. A trial whose weighted return series has zero volatility
/// surfaces `DegenerateMetric` instead of dividing by zero.
pub fn optimize(
    series_map: &BTreeMap<String, PriceSeries>,
    config: &OptimizerConfig,
) -> Result<OptimizationResult> {
    if series_map.is_empty() {
        return Err(BacktestError::InvalidInput(
            "no price series loaded".to_string(),
        ));
    }
    if config.num_trials == 0 {
        return Err(BacktestError::InvalidInput(
            "optimizer needs at least one trial".to_string(),
        ));
    }

    let tickers: Vec<String> = series_map.keys().cloned().collect();
    let returns_matrix: Vec<Vec<f64>> = series_map.values().map(simple_returns).collect();

    // Dot products need aligned days; clip to the shortest ticker.
    let num_return_days = returns_matrix
        .iter()
        .map(|r| r.len())
        .min()
        .unwrap_or(0);
    if num_return_days == 0 {
        return Err(BacktestError::InvalidInput(
            "every ticker needs at least two prices".to_string(),
        ));
    }
    let num_days = num_return_days + 1;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        trials = config.num_trials,
        tickers = tickers.len(),
        days = num_days,
        "starting Monte Carlo weight search"
    );

    let mut best: Option<(WeightVector, PortfolioMetrics)> = None;

    for trial in 0..config.num_trials {
        let weights = random_weights(tickers.len(), &mut rng)?;
        let metrics = trial_metrics(
            &returns_matrix,
            &weights,
            num_return_days,
            num_days,
            config.daily_risk_free_rate,
        )?;

        debug!(trial, sharpe = metrics.sharpe_ratio, "trial scored");

        best = Some(match best {
            Some(current) if metrics.sharpe_ratio <= current.1.sharpe_ratio => current,
            _ => (weights, metrics),
        });
    }

    // num_trials > 0 guarantees at least one trial seeded the accumulator.
    let (weights, metrics) = best.ok_or_else(|| {
        BacktestError::InvalidInput("optimizer produced no trials".to_string())
    })?;

    Ok(OptimizationResult {
        tickers,
        weights,
        metrics,
        trials: config.num_trials,
    })
}

/// One uniform non-negative draw per ticker, normalized to sum to one.
fn random_weights(num_tickers: usize, rng: &mut StdRng) -> Result<WeightVector> {
    let raw: Vec<f64> = (0..num_tickers).map(|_| rng.gen::<f64>()).collect();
    WeightVector::normalized(&raw)
}

/// Per-ticker simple daily returns `(p[t] - p[t-1]) / p[t-1]`, divided
/// under the shared decimal rounding policy before converting to `f64`.
fn simple_returns(series: &PriceSeries) -> Vec<f64> {
    let closes = series.adj_closes();
    closes
        .windows(2)
        .map(|w| div(w[1] - w[0], w[0]).to_f64().unwrap_or(0.0))
        .collect()
}

fn trial_metrics(
    returns_matrix: &[Vec<f64>],
    weights: &WeightVector,
    num_return_days: usize,
    num_days: usize,
    daily_risk_free_rate: f64,
) -> Result<PortfolioMetrics> {
    let weights = weights.as_slice();

    let portfolio_returns: Vec<f64> = (0..num_return_days)
        .map(|day| {
            returns_matrix
                .iter()
                .zip(weights)
                .map(|(returns, w)| returns[day] * w)
                .sum()
        })
        .collect();

    let n = portfolio_returns.len() as f64;
    let mean: f64 = portfolio_returns.iter().sum::<f64>() / n;

    // Population variance about the same mean.
    let variance: f64 = portfolio_returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / n;
    let volatility = variance.sqrt();

    if volatility == 0.0 {
        return Err(BacktestError::DegenerateMetric(
            "trial Sharpe undefined: volatility is zero".to_string(),
        ));
    }

    let sharpe_ratio = (mean - daily_risk_free_rate) / volatility;
    let max_drawdown = drawdown_from_returns(&portfolio_returns);
    let annualized_return = (1.0 + mean).powf(252.0 / num_days as f64) - 1.0;

    Ok(PortfolioMetrics {
        mean_daily_return: mean,
        volatility,
        sharpe_ratio,
        max_drawdown,
        annualized_return,
    })
}

/// Peak-tracking drawdown over a compounding path seeded at 1.0 and driven
/// by the daily returns.
fn drawdown_from_returns(returns: &[f64]) -> f64 {
    let mut value = 1.0;
    let mut peak = 1.0;
    let mut max_dd = 0.0;

    for r in returns {
        value *= 1.0 + r;
        if value > peak {
            peak = value;
        }
        let drawdown = (peak - value) / peak;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }
    max_dd
}
