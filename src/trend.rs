//! Least-squares linear trend extrapolation.

use crate::error::{BacktestError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Ordinary least-squares fit of `y = m*x + b` over a trailing window.
///
/// The window is indexed `x = 1..=window`, and `predict` evaluates the
/// fitted line at an arbitrary future x. Prices convert to `f64` for the
/// normal equations; the slope/intercept arithmetic has no decimal
/// counterpart worth preserving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearTrend {
    window: usize,
}

impl LinearTrend {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "window must be positive");
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Fit the trailing `window` points of `series` and evaluate at
    /// `future_x` (so `window + 1` predicts the next period).
    ///
    /// Errors with `DegenerateFit` when the normal-equation denominator
    /// `n*sum(x^2) - sum(x)^2` is zero instead of propagating NaN or
    /// infinity.
    pub fn predict(&self, series: &[Decimal], future_x: usize) -> Result<f64> {
        if series.len() < self.window {
            return Err(BacktestError::InvalidInput(format!(
                "linear trend needs {} points, got {}",
                self.window,
                series.len()
            )));
        }

        let recent = &series[series.len() - self.window..];
        let n = recent.len() as f64;

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_x2 = 0.0;

        for (i, price) in recent.iter().enumerate() {
            let x = (i + 1) as f64;
            let y = price.to_f64().unwrap_or(0.0);
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let denominator = n * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            return Err(BacktestError::DegenerateFit);
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        Ok(slope * future_x as f64 + intercept)
    }
}
