//! Core data types for the backtest engine.

use crate::error::{BacktestError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when validating that portfolio weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// A single daily price observation for one instrument.
///
/// Bars are immutable once constructed. The adjusted close always carries a
/// value; the remaining OHLCV fields exist only when the data source
/// provides them and stay `None` otherwise so that absent data can never be
/// mistaken for a zero price downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub adj_close: Decimal,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<u64>,
    pub ticker: Option<String>,
}

impl PriceBar {
    /// Create a fully populated OHLCV bar.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        adj_close: Decimal,
        volume: u64,
        ticker: impl Into<String>,
    ) -> Self {
        Self {
            date,
            adj_close,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
            ticker: Some(ticker.into()),
        }
    }

    /// Create a partial bar carrying only a date and adjusted close.
    pub fn partial(date: NaiveDate, adj_close: Decimal) -> Self {
        Self {
            date,
            adj_close,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
            ticker: None,
        }
    }
}

/// An ordered-by-date sequence of bars for one ticker.
///
/// Invariant: dates are strictly increasing. Indicators operate on the
/// positional index of this sequence, not on calendar distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Construct a series, validating the date ordering invariant.
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self> {
        let ticker = ticker.into();
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(BacktestError::DataError(format!(
                    "{}: bar dates must be strictly increasing ({} followed by {})",
                    ticker, pair[0].date, pair[1].date
                )));
            }
        }
        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Adjusted closes in date order, the input every indicator consumes.
    pub fn adj_closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.adj_close).collect()
    }
}

/// Daily position signal for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Signal {
    /// Enter long for the day.
    Long,
    /// Enter short for the day.
    Short,
    /// No trade (also used for warm-up days).
    #[default]
    Flat,
}

impl Signal {
    /// Sign of the signal's daily return contribution.
    pub fn direction(&self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Short => -1.0,
            Signal::Flat => 0.0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Long => write!(f, "LONG"),
            Signal::Short => write!(f, "SHORT"),
            Signal::Flat => write!(f, "FLAT"),
        }
    }
}

/// Non-negative portfolio weights summing to one, in fixed ticker order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    /// Validate and wrap a weight vector.
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(BacktestError::InvalidInput(
                "weight vector must not be empty".to_string(),
            ));
        }
        if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(BacktestError::InvalidInput(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(BacktestError::InvalidInput(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(Self(weights))
    }

    /// Normalize raw non-negative draws into a weight vector.
    pub fn normalized(raw: &[f64]) -> Result<Self> {
        let total: f64 = raw.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(BacktestError::InvalidInput(
                "cannot normalize weights with non-positive sum".to_string(),
            ));
        }
        Self::new(raw.iter().map(|w| w / total).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weights scaled to percentages for reporting.
    pub fn as_percentages(&self) -> Vec<f64> {
        self.0.iter().map(|w| w * 100.0).collect()
    }
}

/// Immutable risk/return snapshot produced once per optimizer trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Mean daily simple return of the weighted portfolio.
    pub mean_daily_return: f64,
    /// Population standard deviation of daily returns.
    pub volatility: f64,
    /// (mean daily return - daily risk-free rate) / volatility.
    pub sharpe_ratio: f64,
    /// Maximum peak-to-trough decline of the compounding value path.
    pub max_drawdown: f64,
    /// (1 + mean daily return)^(252 / trading days) - 1.
    pub annualized_return: f64,
}
