//! Error types for the backtest engine.

use thiserror::Error;

/// Main error type for the backtest engine.
///
/// Insufficient history is deliberately *not* an error: indicators return an
/// empty series and strategies emit flat signals instead. Only true
/// numerical degeneracies and malformed inputs surface here.
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A ratio's denominator (volatility, downside deviation) is exactly
    /// zero. Surfaced explicitly rather than producing infinity or NaN.
    #[error("Degenerate metric: {0}")]
    DegenerateMetric(String),

    /// The least-squares normal-equation denominator is zero.
    #[error("Degenerate fit: normal-equation denominator is zero")]
    DegenerateFit,

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParseError(#[from] chrono::ParseError),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type alias for backtest operations.
pub type Result<T> = std::result::Result<T, BacktestError>;
