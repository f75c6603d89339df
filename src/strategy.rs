//! Strategy trait: whole-series signal generation per instrument.

use crate::error::Result;
use crate::types::Signal;
use rust_decimal::Decimal;

/// Trait that all trading strategies must implement.
///
/// A strategy converts one instrument's full adjusted-close history into
/// one [`Signal`] per day. The output is always the same length as the
/// input: days before the warm-up period (and any day for which an
/// indicator value is unavailable) carry `Signal::Flat` rather than being
/// omitted, so every strategy shares a single alignment convention.
pub trait Strategy: Send + Sync {
    /// Name of the strategy for reporting.
    fn name(&self) -> &str;

    /// Number of leading days that are always flat while indicators warm up.
    fn warmup_period(&self) -> usize;

    /// One signal per input day, flat during warm-up.
    fn signals(&self, prices: &[Decimal]) -> Result<Vec<Signal>>;

    /// Strategy parameters as key-value pairs for logging.
    fn parameters(&self) -> Vec<(String, String)> {
        vec![]
    }
}
