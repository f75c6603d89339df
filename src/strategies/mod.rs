//! Built-in trading strategies.
//!
//! - [`MomentumCrossover`]: RSI filter plus fast/slow EMA crossover
//! - [`MeanReversion`]: SMA band with a linear-trend price prediction

mod mean_reversion;
mod momentum;

pub use mean_reversion::MeanReversion;
pub use momentum::MomentumCrossover;
