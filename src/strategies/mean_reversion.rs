//! Mean reversion strategy: SMA band plus linear-trend price prediction.

use crate::error::Result;
use crate::indicators::Sma;
use crate::strategy::Strategy;
use crate::trend::LinearTrend;
use crate::types::Signal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// SMA-band mean reversion with a least-squares prediction of the next
/// price.
///
/// The trend fit only ever sees prices up to the signal day, so the
/// prediction carries no knowledge of later bars.
///
/// # Signals
/// - Short: price above `(1 + band) * SMA` OR above the predicted next price
/// - Long: price below `(1 - band) * SMA` OR below the predicted next price
/// - Flat: otherwise, and during warm-up
#[derive(Debug, Clone)]
pub struct MeanReversion {
    sma: Sma,
    band: Decimal,
    trend: LinearTrend,
}

impl MeanReversion {
    /// Create a new mean reversion strategy. `band` is the fractional
    /// distance from the SMA that triggers a signal (0.05 = 5%).
    pub fn new(sma_period: usize, band: Decimal, trend_window: usize) -> Self {
        assert!(sma_period > 0, "SMA period must be positive");
        assert!(band > Decimal::ZERO, "band must be positive");

        Self {
            sma: Sma::new(sma_period),
            band,
            trend: LinearTrend::new(trend_window),
        }
    }

    /// Standard parameters: SMA(20), 5% band, 5-day trend window.
    pub fn default_params() -> Self {
        Self::new(20, dec!(0.05), 5)
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &str {
        "Mean Reversion"
    }

    fn warmup_period(&self) -> usize {
        self.sma.offset()
    }

    fn signals(&self, prices: &[Decimal]) -> Result<Vec<Signal>> {
        let mut signals = vec![Signal::Flat; prices.len()];

        let sma_values = self.sma.calculate(prices);
        let upper_factor = Decimal::ONE + self.band;
        let lower_factor = Decimal::ONE - self.band;

        let start = self
            .warmup_period()
            .max(self.trend.window().saturating_sub(1));

        for day in start..prices.len() {
            let Some(sma) = sma_values.get(day - self.sma.offset()) else {
                continue;
            };

            // Predicted next price from the trailing window ending today.
            let predicted = self
                .trend
                .predict(&prices[..=day], self.trend.window() + 1)?;

            let price = prices[day];
            let price_f = price.to_f64().unwrap_or(0.0);

            signals[day] = if price > *sma * upper_factor || price_f > predicted {
                Signal::Short
            } else if price < *sma * lower_factor || price_f < predicted {
                Signal::Long
            } else {
                Signal::Flat
            };
        }

        Ok(signals)
    }

    fn parameters(&self) -> Vec<(String, String)> {
        vec![
            ("sma_period".to_string(), self.sma.period().to_string()),
            ("band".to_string(), self.band.to_string()),
            ("trend_window".to_string(), self.trend.window().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_prices(n: usize) -> Vec<Decimal> {
        vec![Decimal::from(100); n]
    }

    #[test]
    fn flat_market_never_trades() {
        // Price equals both the SMA and the trend prediction exactly, so
        // no strict inequality fires.
        let strategy = MeanReversion::default_params();
        let signals = strategy.signals(&constant_prices(40)).unwrap();
        assert_eq!(signals.len(), 40);
        assert!(signals.iter().all(|s| *s == Signal::Flat));
    }

    #[test]
    fn warmup_days_are_flat() {
        let strategy = MeanReversion::default_params();
        assert_eq!(strategy.warmup_period(), 19);
        let mut prices = constant_prices(30);
        prices[29] = Decimal::from(200);
        let signals = strategy.signals(&prices).unwrap();
        assert!(signals[..19].iter().all(|s| *s == Signal::Flat));
    }

    #[test]
    fn spike_above_band_goes_short() {
        let mut prices = constant_prices(26);
        prices[25] = Decimal::from(120);
        let strategy = MeanReversion::default_params();
        let signals = strategy.signals(&prices).unwrap();
        // SMA(20) over the last window is 101; 120 > 1.05 * 101.
        assert_eq!(signals[25], Signal::Short);
    }

    #[test]
    fn drop_below_band_goes_long() {
        let mut prices = constant_prices(26);
        prices[25] = Decimal::from(80);
        let strategy = MeanReversion::default_params();
        let signals = strategy.signals(&prices).unwrap();
        // SMA(20) over the last window is 99; 80 < 0.95 * 99.
        assert_eq!(signals[25], Signal::Long);
    }

    #[test]
    fn price_below_trend_prediction_goes_long() {
        // A gentle climb (0.25/day from 100) stays inside the 5% SMA band,
        // but the fitted line extrapolates one step above today's close.
        let prices: Vec<Decimal> = (0..30i64).map(|d| Decimal::new(10000 + 25 * d, 2)).collect();
        let strategy = MeanReversion::default_params();
        let signals = strategy.signals(&prices).unwrap();
        assert!(signals[19..].iter().all(|s| *s == Signal::Long));
    }

    #[test]
    fn short_history_is_all_flat() {
        let strategy = MeanReversion::default_params();
        let signals = strategy.signals(&constant_prices(10)).unwrap();
        assert!(signals.iter().all(|s| *s == Signal::Flat));
    }
}
