//! Momentum strategy: RSI filter with fast/slow EMA crossover.

use crate::error::Result;
use crate::indicators::{Ema, Rsi};
use crate::strategy::Strategy;
use crate::types::Signal;
use rust_decimal::Decimal;

/// RSI / EMA crossover momentum strategy.
///
/// Per day, reads RSI at its own offset into the RSI series and each EMA at
/// its own offset into its series (indicator series are shorter than the
/// price series; the offsets differ per indicator).
///
/// # Signals
/// - Short: RSI above the overbought level AND slow EMA below fast EMA
/// - Long: RSI below the oversold level AND fast EMA below slow EMA
/// - Flat: otherwise, and during warm-up
#[derive(Debug, Clone)]
pub struct MomentumCrossover {
    rsi: Rsi,
    fast: Ema,
    slow: Ema,
    overbought: Decimal,
    oversold: Decimal,
}

impl MomentumCrossover {
    /// Create a new momentum strategy.
    pub fn new(rsi_period: usize, fast_period: usize, slow_period: usize) -> Self {
        assert!(rsi_period > 0, "RSI period must be positive");
        assert!(
            fast_period > 0 && fast_period < slow_period,
            "fast EMA period must be positive and below the slow period"
        );

        Self {
            rsi: Rsi::new(rsi_period),
            fast: Ema::new(fast_period),
            slow: Ema::new(slow_period),
            overbought: Decimal::from(60),
            oversold: Decimal::from(40),
        }
    }

    /// Standard parameters: RSI(14) with EMA(10)/EMA(20).
    pub fn default_params() -> Self {
        Self::new(14, 10, 20)
    }
}

impl Strategy for MomentumCrossover {
    fn name(&self) -> &str {
        "Momentum Crossover"
    }

    fn warmup_period(&self) -> usize {
        // 26 bars with the default 10/20 EMAs. The signal loop additionally
        // skips any day an indicator has not produced a value for.
        self.slow.period() + 6
    }

    fn signals(&self, prices: &[Decimal]) -> Result<Vec<Signal>> {
        let mut signals = vec![Signal::Flat; prices.len()];

        let rsi_values = self.rsi.calculate(prices);
        let fast_values = self.fast.calculate(prices);
        let slow_values = self.slow.calculate(prices);

        let start = self
            .warmup_period()
            .max(self.rsi.offset())
            .max(self.fast.offset())
            .max(self.slow.offset());

        for day in start..prices.len() {
            let rsi = rsi_values.get(day - self.rsi.offset());
            let fast = fast_values.get(day - self.fast.offset());
            let slow = slow_values.get(day - self.slow.offset());

            let (Some(rsi), Some(fast), Some(slow)) = (rsi, fast, slow) else {
                continue;
            };

            signals[day] = if *rsi > self.overbought && slow < fast {
                Signal::Short
            } else if *rsi < self.oversold && fast < slow {
                Signal::Long
            } else {
                Signal::Flat
            };
        }

        Ok(signals)
    }

    fn parameters(&self) -> Vec<(String, String)> {
        vec![
            ("rsi_period".to_string(), self.rsi.period().to_string()),
            ("fast_period".to_string(), self.fast.period().to_string()),
            ("slow_period".to_string(), self.slow.period().to_string()),
        ]
    }
}
