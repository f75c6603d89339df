//! Rolling technical indicators over adjusted-close price series.
//!
//! Each calculator maps a full price sequence to a derived sequence that is
//! shorter than its input by a fixed offset. Callers align the two by
//! positional index: indicator index `i` corresponds to price index
//! `i + offset()`. The offset is exposed on every calculator so the
//! bookkeeping never lives in call sites as a magic number.
//!
//! Prices are `rust_decimal::Decimal` and every division rounds half-up
//! (midpoint away from zero) at [`DIV_SCALE`] decimal places, applied
//! uniformly through [`div`] so fixtures reproduce exactly.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept after every division and smoothing step.
pub const DIV_SCALE: u32 = 8;

/// Round a decimal to the shared indicator precision, half-up.
pub(crate) fn round_dec(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DIV_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Divide under the shared rounding policy.
pub(crate) fn div(numerator: Decimal, denominator: Decimal) -> Decimal {
    round_dec(numerator / denominator)
}

/// Simple moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Price index of the first emitted value.
    pub fn offset(&self) -> usize {
        self.period.saturating_sub(1)
    }

    /// One arithmetic mean per trailing window. Empty when the input is
    /// shorter than the period (insufficient data is not an error).
    ///
    /// Uses a running sum; decimal addition and subtraction are exact, so
    /// only the final division rounds and results match a full-window
    /// recompute.
    pub fn calculate(&self, prices: &[Decimal]) -> Vec<Decimal> {
        if self.period == 0 || prices.len() < self.period {
            return Vec::new();
        }

        let period_dec = Decimal::from(self.period as u64);
        let mut sum: Decimal = prices[..self.period].iter().sum();
        let mut values = Vec::with_capacity(prices.len() - self.period + 1);
        values.push(div(sum, period_dec));

        for i in self.period..prices.len() {
            sum += prices[i] - prices[i - self.period];
            values.push(div(sum, period_dec));
        }

        values
    }
}

/// Exponential moving average seeded with the simple mean of the first
/// window, so its first output equals the SMA's first output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Price index of the first emitted (seed) value.
    pub fn offset(&self) -> usize {
        self.period.saturating_sub(1)
    }

    /// Seed = mean of the first `period` prices, then
    /// `ema[t] = price[t]*alpha + ema[t-1]*(1-alpha)` with
    /// `alpha = 2/(period+1)`. Output length `len - period + 1`.
    pub fn calculate(&self, prices: &[Decimal]) -> Vec<Decimal> {
        if self.period == 0 || prices.len() < self.period {
            return Vec::new();
        }

        let period_dec = Decimal::from(self.period as u64);
        let alpha = div(Decimal::TWO, period_dec + Decimal::ONE);
        let one_minus_alpha = Decimal::ONE - alpha;

        let seed: Decimal = prices[..self.period].iter().sum();
        let mut ema = div(seed, period_dec);

        let mut values = Vec::with_capacity(prices.len() - self.period + 1);
        values.push(ema);

        for price in &prices[self.period..] {
            ema = round_dec(*price * alpha + ema * one_minus_alpha);
            values.push(ema);
        }

        values
    }
}

/// Relative strength index on the 0-100 scale, Wilder-smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Price index of the first emitted value.
    pub fn offset(&self) -> usize {
        self.period
    }

    /// Requires strictly more prices than the period (the first `period`
    /// day-over-day changes seed the averages), else empty. Output length
    /// `len - period`.
    pub fn calculate(&self, prices: &[Decimal]) -> Vec<Decimal> {
        if self.period == 0 || prices.len() <= self.period {
            return Vec::new();
        }

        let period_dec = Decimal::from(self.period as u64);
        let prev_weight = Decimal::from(self.period as u64 - 1);

        // Seed: gains and losses accumulated separately over the first
        // window, losses stored as positive magnitudes.
        let mut gain_sum = Decimal::ZERO;
        let mut loss_sum = Decimal::ZERO;
        for i in 1..=self.period {
            let change = prices[i] - prices[i - 1];
            if change > Decimal::ZERO {
                gain_sum += change;
            } else {
                loss_sum += -change;
            }
        }
        let mut avg_gain = div(gain_sum, period_dec);
        let mut avg_loss = div(loss_sum, period_dec);

        let mut values = Vec::with_capacity(prices.len() - self.period);
        values.push(Self::rsi_value(avg_gain, avg_loss));

        for i in self.period + 1..prices.len() {
            let change = prices[i] - prices[i - 1];
            let gain = change.max(Decimal::ZERO);
            let loss = (-change).max(Decimal::ZERO);

            avg_gain = div(avg_gain * prev_weight + gain, period_dec);
            avg_loss = div(avg_loss * prev_weight + loss, period_dec);

            values.push(Self::rsi_value(avg_gain, avg_loss));
        }

        values
    }

    fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
        if avg_loss.is_zero() {
            return Decimal::ONE_HUNDRED;
        }
        let rs = div(avg_gain, avg_loss);
        Decimal::ONE_HUNDRED - div(Decimal::ONE_HUNDRED, Decimal::ONE + rs)
    }
}
