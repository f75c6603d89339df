//! Price-series loading for the backtest engine.
//!
//! The external contract is a single wide CSV: the header row is
//! `date,TICK1,TICK2,...` and every following row is one trading day of
//! adjusted closes. Loading produces, for each ticker, an ordered-by-date
//! [`PriceSeries`]. A price cell that fails to parse is dropped for that
//! ticker and date with a warning; the rest of the load proceeds.

use crate::error::{BacktestError, Result};
use crate::types::{PriceBar, PriceSeries};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Data source configuration.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Date format string for parsing (e.g., "%Y-%m-%d"). When unset, a
    /// list of common formats is tried.
    pub date_format: Option<String>,
    /// Skip rows whose date fails to parse instead of failing the load.
    pub skip_invalid: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            date_format: None,
            skip_invalid: true,
        }
    }
}

/// Parse a date string with multiple format attempts.
fn parse_date(s: &str, format: Option<&str>) -> Result<NaiveDate> {
    if let Some(fmt) = format {
        return Ok(NaiveDate::parse_from_str(s, fmt)?);
    }

    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y"];
    let mut last_err = None;
    for fmt in &formats {
        match NaiveDate::parse_from_str(s, fmt) {
            Ok(d) => return Ok(d),
            Err(e) => last_err = Some(e),
        }
    }

    match last_err {
        Some(e) => Err(e.into()),
        None => Err(BacktestError::DataError(format!("unparseable date: {s}"))),
    }
}

/// Load a wide CSV of adjusted closes from a file path.
pub fn load_wide_csv(
    path: impl AsRef<Path>,
    config: &DataConfig,
) -> Result<BTreeMap<String, PriceSeries>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let map = read_wide_csv(file, config)?;
    info!(
        path = %path.display(),
        tickers = map.len(),
        "loaded price data"
    );
    Ok(map)
}

/// Load a wide CSV of adjusted closes from any reader.
pub fn read_wide_csv<R: Read>(
    reader: R,
    config: &DataConfig,
) -> Result<BTreeMap<String, PriceSeries>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(BacktestError::DataError(
            "wide CSV needs a date column and at least one ticker column".to_string(),
        ));
    }
    let tickers: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

    let mut bars_by_ticker: BTreeMap<String, Vec<PriceBar>> = tickers
        .iter()
        .map(|t| (t.clone(), Vec::new()))
        .collect();

    for record in csv_reader.records() {
        let record = record?;
        let Some(date_field) = record.get(0) else {
            continue;
        };

        let date = match parse_date(date_field, config.date_format.as_deref()) {
            Ok(d) => d,
            Err(e) => {
                if config.skip_invalid {
                    warn!(row_date = date_field, error = %e, "skipping row with unparseable date");
                    continue;
                }
                return Err(e);
            }
        };

        for (i, ticker) in tickers.iter().enumerate() {
            let Some(cell) = record.get(i + 1) else {
                warn!(ticker = ticker.as_str(), %date, "missing price cell");
                continue;
            };

            match Decimal::from_str(cell) {
                Ok(price) => {
                    if let Some(bars) = bars_by_ticker.get_mut(ticker) {
                        bars.push(PriceBar::partial(date, price));
                    }
                }
                Err(_) => {
                    warn!(
                        ticker = ticker.as_str(),
                        %date,
                        cell,
                        "skipping unparseable price cell"
                    );
                }
            }
        }
    }

    bars_by_ticker
        .into_iter()
        .map(|(ticker, bars)| {
            let series = PriceSeries::new(ticker.clone(), bars)?;
            Ok((ticker, series))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
date,AAPL,MSFT
2024-01-02,185.64,370.87
2024-01-03,184.25,370.60
2024-01-04,181.91,367.94
";

    #[test]
    fn loads_one_series_per_ticker() {
        let map = read_wide_csv(SAMPLE.as_bytes(), &DataConfig::default()).unwrap();
        assert_eq!(map.len(), 2);

        let aapl = &map["AAPL"];
        assert_eq!(aapl.len(), 3);
        assert_eq!(aapl.bars()[0].adj_close, dec!(185.64));
        assert_eq!(
            aapl.bars()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert!(aapl.bars()[0].open.is_none());

        assert_eq!(map["MSFT"].adj_closes()[2], dec!(367.94));
    }

    #[test]
    fn malformed_cell_is_skipped_not_fatal() {
        let csv = "\
date,AAPL,MSFT
2024-01-02,185.64,370.87
2024-01-03,n/a,370.60
2024-01-04,181.91,367.94
";
        let map = read_wide_csv(csv.as_bytes(), &DataConfig::default()).unwrap();
        // AAPL lost one observation, MSFT kept all three.
        assert_eq!(map["AAPL"].len(), 2);
        assert_eq!(map["MSFT"].len(), 3);
        assert_eq!(map["AAPL"].adj_closes(), vec![dec!(185.64), dec!(181.91)]);
    }

    #[test]
    fn bad_date_row_is_skipped_when_configured() {
        let csv = "\
date,AAPL
2024-01-02,185.64
not-a-date,184.25
2024-01-04,181.91
";
        let map = read_wide_csv(csv.as_bytes(), &DataConfig::default()).unwrap();
        assert_eq!(map["AAPL"].len(), 2);

        let strict = DataConfig {
            skip_invalid: false,
            ..Default::default()
        };
        assert!(read_wide_csv(csv.as_bytes(), &strict).is_err());
    }

    #[test]
    fn out_of_order_dates_fail_the_invariant() {
        let csv = "\
date,AAPL
2024-01-04,181.91
2024-01-02,185.64
";
        assert!(matches!(
            read_wide_csv(csv.as_bytes(), &DataConfig::default()),
            Err(BacktestError::DataError(_))
        ));
    }

    #[test]
    fn explicit_date_format_is_honored() {
        let csv = "\
date,AAPL
02/01/2024,185.64
03/01/2024,184.25
";
        let config = DataConfig {
            date_format: Some("%d/%m/%Y".to_string()),
            ..Default::default()
        };
        let map = read_wide_csv(csv.as_bytes(), &config).unwrap();
        assert_eq!(
            map["AAPL"].bars()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn header_only_input_yields_empty_series() {
        let map = read_wide_csv("date,AAPL\n".as_bytes(), &DataConfig::default()).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map["AAPL"].is_empty());
    }

    #[test]
    fn missing_ticker_columns_are_rejected() {
        assert!(read_wide_csv("date\n2024-01-02\n".as_bytes(), &DataConfig::default()).is_err());
    }
}
