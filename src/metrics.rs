//! Performance evaluation over realized daily-return series.
//!
//! All functions are pure: immutable input slices in, values out. The
//! Sharpe and Sortino formulations mix compounded-return annualization
//! with log-deviation risk measures. That shape is deliberate and kept
//! stable so stored results stay comparable across versions; do not
//! normalize them to the textbook definitions.

use crate::error::{BacktestError, Result};
use serde::{Deserialize, Serialize};

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

fn require_returns(returns: &[f64]) -> Result<()> {
    if returns.is_empty() {
        return Err(BacktestError::InvalidInput(
            "daily return series must not be empty".to_string(),
        ));
    }
    if returns.iter().any(|r| *r <= -1.0 || !r.is_finite()) {
        return Err(BacktestError::InvalidInput(
            "daily returns must be finite and greater than -100%".to_string(),
        ));
    }
    Ok(())
}

/// Compounded return over the whole series: `prod(1 + r) - 1`.
pub fn cumulative_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// `(1 + cumulative)^(252/N) - 1`.
pub fn annualized_return(returns: &[f64]) -> Result<f64> {
    require_returns(returns)?;
    let cumulative = cumulative_return(returns);
    Ok((1.0 + cumulative).powf(TRADING_DAYS / returns.len() as f64) - 1.0)
}

/// Sharpe ratio with compounded annualization and log-deviation volatility.
///
/// Numerator: annualized compounded return minus `(1 + rf)^252 - 1` for the
/// daily risk-free rate. Denominator: per-day deviations of `ln(1 + r)`
/// from `ln(1 + cumulative/N)`, population-averaged and scaled by
/// `sqrt(252)`. Zero volatility is a degenerate metric, not infinity.
pub fn sharpe_ratio(returns: &[f64], daily_risk_free_rate: f64) -> Result<f64> {
    require_returns(returns)?;
    let n = returns.len() as f64;

    let cumulative = cumulative_return(returns);
    let annualized = (1.0 + cumulative).powf(TRADING_DAYS / n) - 1.0;
    let annualized_rf = (1.0 + daily_risk_free_rate).powf(TRADING_DAYS) - 1.0;

    let mean_log = (1.0 + cumulative / n).ln();
    let daily_variance = returns
        .iter()
        .map(|r| ((1.0 + r).ln() - mean_log).powi(2))
        .sum::<f64>()
        / n;
    let annualized_volatility = daily_variance.sqrt() * TRADING_DAYS.sqrt();

    if annualized_volatility == 0.0 {
        return Err(BacktestError::DegenerateMetric(
            "Sharpe ratio undefined: volatility is zero".to_string(),
        ));
    }

    Ok((annualized - annualized_rf) / annualized_volatility)
}

/// Sortino ratio: same numerator as [`sharpe_ratio`], denominator built
/// from log-transformed negative daily returns only, scaled by `sqrt(252)`.
pub fn sortino_ratio(returns: &[f64], daily_risk_free_rate: f64) -> Result<f64> {
    require_returns(returns)?;
    let n = returns.len() as f64;

    let cumulative = cumulative_return(returns);
    let annualized = (1.0 + cumulative).powf(TRADING_DAYS / n) - 1.0;
    let annualized_rf = (1.0 + daily_risk_free_rate).powf(TRADING_DAYS) - 1.0;

    let downside_sum: f64 = returns
        .iter()
        .filter(|r| **r < 0.0)
        .map(|r| (1.0 + r).ln().powi(2))
        .sum();
    let downside_deviation = (downside_sum / n).sqrt() * TRADING_DAYS.sqrt();

    if downside_deviation == 0.0 {
        return Err(BacktestError::DegenerateMetric(
            "Sortino ratio undefined: downside deviation is zero".to_string(),
        ));
    }

    Ok((annualized - annualized_rf) / downside_deviation)
}

/// Maximum peak-to-trough decline over a sequence of portfolio *values*
/// (not returns). Zero for an empty or monotonically non-decreasing path.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0;
    for &value in values {
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

/// Fraction of days with strictly positive return.
pub fn win_rate(returns: &[f64]) -> Result<f64> {
    require_returns(returns)?;
    let winners = returns.iter().filter(|r| **r > 0.0).count();
    Ok(winners as f64 / returns.len() as f64)
}

/// Compounding value path from an initial capital; the initial value is
/// included, so the output has one more element than the input.
pub fn portfolio_values(returns: &[f64], initial_capital: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(returns.len() + 1);
    let mut value = initial_capital;
    values.push(value);
    for r in returns {
        value *= 1.0 + r;
        values.push(value);
    }
    values
}

/// Summary risk/return statistics for one realized daily-return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub num_days: usize,
    pub cumulative_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
}

impl RiskReport {
    /// Evaluate all metrics over one return series. The drawdown is taken
    /// over the compounding value path seeded at `initial_capital`.
    pub fn calculate(
        returns: &[f64],
        daily_risk_free_rate: f64,
        initial_capital: f64,
    ) -> Result<Self> {
        require_returns(returns)?;
        let values = portfolio_values(returns, initial_capital);

        Ok(Self {
            num_days: returns.len(),
            cumulative_return: cumulative_return(returns),
            annualized_return: annualized_return(returns)?,
            sharpe_ratio: sharpe_ratio(returns, daily_risk_free_rate)?,
            sortino_ratio: sortino_ratio(returns, daily_risk_free_rate)?,
            max_drawdown: max_drawdown(&values),
            win_rate: win_rate(returns)?,
        })
    }
}
