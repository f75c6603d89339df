//! Basket backtest driver: per-ticker signals to daily portfolio returns.

use crate::error::{BacktestError, Result};
use crate::metrics::{portfolio_values, RiskReport};
use crate::strategy::Strategy;
use crate::types::PriceSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Fixed daily return contribution of a single long or short signal.
pub const SIGNAL_RETURN: f64 = 0.01;

/// Default initial capital for the compounding value path.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

/// Run a strategy across a basket and aggregate equal-weighted daily
/// returns.
///
/// Output has one entry per trading day (the longest series defines the
/// day count) with zeros before warm-up. Each day averages the per-ticker
/// contributions over the *total* ticker count; a ticker with no signal
/// for a day, including one whose history has already ended, contributes
/// zero rather than erroring.
pub fn run_strategy(
    series_map: &BTreeMap<String, PriceSeries>,
    strategy: &dyn Strategy,
) -> Result<Vec<f64>> {
    if series_map.is_empty() {
        return Err(BacktestError::InvalidInput(
            "no price series loaded".to_string(),
        ));
    }

    let mut per_ticker_signals = Vec::with_capacity(series_map.len());
    let mut num_days = 0;

    for (ticker, series) in series_map {
        let signals = strategy.signals(&series.adj_closes())?;
        debug!(
            ticker = ticker.as_str(),
            days = signals.len(),
            "generated signals"
        );
        num_days = num_days.max(signals.len());
        per_ticker_signals.push(signals);
    }

    let ticker_count = series_map.len() as f64;
    let mut daily_returns = Vec::with_capacity(num_days);

    for day in 0..num_days {
        let total: f64 = per_ticker_signals
            .iter()
            .filter_map(|signals| signals.get(day))
            .map(|signal| signal.direction() * SIGNAL_RETURN)
            .sum();
        daily_returns.push(total / ticker_count);
    }

    Ok(daily_returns)
}

/// Full backtest output: the realized return series, its compounding value
/// path, and the evaluated risk report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub strategy: String,
    pub tickers: Vec<String>,
    pub daily_returns: Vec<f64>,
    pub values: Vec<f64>,
    pub report: RiskReport,
}

/// Run a strategy and evaluate the realized return series.
pub fn run_backtest(
    series_map: &BTreeMap<String, PriceSeries>,
    strategy: &dyn Strategy,
    daily_risk_free_rate: f64,
    initial_capital: f64,
) -> Result<BacktestSummary> {
    info!(
        strategy = strategy.name(),
        tickers = series_map.len(),
        "running backtest"
    );

    let daily_returns = run_strategy(series_map, strategy)?;
    let report = RiskReport::calculate(&daily_returns, daily_risk_free_rate, initial_capital)?;
    let values = portfolio_values(&daily_returns, initial_capital);

    Ok(BacktestSummary {
        strategy: strategy.name().to_string(),
        tickers: series_map.keys().cloned().collect(),
        daily_returns,
        values,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriceBar, Signal};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    struct FixedSignals(Vec<Signal>);

    impl Strategy for FixedSignals {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn warmup_period(&self) -> usize {
            0
        }

        fn signals(&self, prices: &[Decimal]) -> Result<Vec<Signal>> {
            let mut out = self.0.clone();
            out.resize(prices.len(), Signal::Flat);
            Ok(out)
        }
    }

    fn series(ticker: &str, n: usize) -> (String, PriceSeries) {
        let bars: Vec<PriceBar> = (0..n)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(d as i64);
                PriceBar::partial(date, Decimal::from(100))
            })
            .collect();
        (ticker.to_string(), PriceSeries::new(ticker, bars).unwrap())
    }

    #[test]
    fn averages_across_full_ticker_count() {
        let mut map = BTreeMap::new();
        map.extend([series("A", 3), series("B", 3)]);

        // Both tickers long every day: (0.01 + 0.01) / 2 per day.
        let strategy = FixedSignals(vec![Signal::Long, Signal::Long, Signal::Long]);
        let returns = run_strategy(&map, &strategy).unwrap();
        assert_eq!(returns, vec![0.01, 0.01, 0.01]);
    }

    #[test]
    fn opposing_signals_cancel() {
        struct PerTicker;
        impl Strategy for PerTicker {
            fn name(&self) -> &str {
                "PerTicker"
            }
            fn warmup_period(&self) -> usize {
                0
            }
            fn signals(&self, prices: &[Decimal]) -> Result<Vec<Signal>> {
                // Long for the ticker priced at 100, short otherwise.
                let signal = if prices[0] == Decimal::from(100) {
                    Signal::Long
                } else {
                    Signal::Short
                };
                Ok(vec![signal; prices.len()])
            }
        }

        let bars_a: Vec<PriceBar> = (0..3)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(d as i64);
                PriceBar::partial(date, Decimal::from(100))
            })
            .collect();
        let bars_b: Vec<PriceBar> = (0..3)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(d as i64);
                PriceBar::partial(date, Decimal::from(101))
            })
            .collect();

        let mut map = BTreeMap::new();
        map.insert("A".to_string(), PriceSeries::new("A", bars_a).unwrap());
        map.insert("B".to_string(), PriceSeries::new("B", bars_b).unwrap());

        let returns = run_strategy(&map, &PerTicker).unwrap();
        assert_eq!(returns, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn shorter_ticker_contributes_zero_after_its_history_ends() {
        let mut map = BTreeMap::new();
        map.extend([series("A", 4), series("B", 2)]);

        let strategy = FixedSignals(vec![Signal::Long; 4]);
        let returns = run_strategy(&map, &strategy).unwrap();
        assert_eq!(returns.len(), 4);
        assert_eq!(returns[0], 0.01);
        assert_eq!(returns[1], 0.01);
        // B's history ended; only A contributes but the divisor stays 2.
        assert_eq!(returns[2], 0.005);
        assert_eq!(returns[3], 0.005);
    }

    #[test]
    fn empty_basket_is_invalid() {
        let map = BTreeMap::new();
        let strategy = FixedSignals(vec![]);
        assert!(matches!(
            run_strategy(&map, &strategy),
            Err(BacktestError::InvalidInput(_))
        ));
    }
}
