//! Format backtest and optimization results for terminal display.

use crate::backtest::BacktestSummary;
use crate::error::Result;
use crate::optimizer::OptimizationResult;
use colored::Colorize;
use tabled::{builder::Builder, settings::Style};

/// Format results for terminal display.
pub struct ResultFormatter;

impl ResultFormatter {
    /// Print a backtest report to stdout.
    pub fn print_backtest(summary: &BacktestSummary) {
        let report = &summary.report;

        println!();
        println!("{}", "═".repeat(60).blue());
        println!("{}", " BACKTEST RESULTS ".bold().blue());
        println!("{}", "═".repeat(60).blue());
        println!();

        println!("{}", "Overview".bold().underline());
        println!("  Strategy:          {}", summary.strategy);
        println!("  Tickers:           {}", summary.tickers.join(", "));
        println!("  Trading Days:      {}", report.num_days);
        println!();

        println!("{}", "Performance".bold().underline());
        println!(
            "  Cumulative Return: {:>10.4}%  {}",
            report.cumulative_return * 100.0,
            Self::format_pct_change(report.cumulative_return * 100.0)
        );
        println!(
            "  Annualized Return: {:>10.4}%",
            report.annualized_return * 100.0
        );
        println!("  Win Rate:          {:>10.2}%", report.win_rate * 100.0);
        println!();

        println!("{}", "Risk Metrics".bold().underline());
        println!(
            "  Max Drawdown:      {:>10.4}%",
            report.max_drawdown * 100.0
        );
        println!("  Sharpe Ratio:      {:>10.4}", report.sharpe_ratio);
        println!("  Sortino Ratio:     {:>10.4}", report.sortino_ratio);
        println!();

        println!("{}", "═".repeat(60).blue());
    }

    /// Print the winning optimizer trial to stdout.
    pub fn print_optimization(result: &OptimizationResult) {
        println!();
        println!("{}", "═".repeat(60).blue());
        println!("{}", " OPTIMAL PORTFOLIO WEIGHTS ".bold().blue());
        println!("{}", "═".repeat(60).blue());
        println!();
        println!("  Trials: {}", result.trials);
        println!();

        let mut builder = Builder::default();
        builder.push_record(["Ticker", "Weight"]);
        for (ticker, pct) in result.tickers.iter().zip(result.weights.as_percentages()) {
            builder.push_record([ticker.clone(), format!("{pct:.2}%")]);
        }
        let table = builder.build().with(Style::rounded()).to_string();
        println!("{table}");
        println!();

        let metrics = &result.metrics;
        println!("{}", "Winning Trial Metrics".bold().underline());
        println!(
            "  Mean Daily Return: {:>10.6}%",
            metrics.mean_daily_return * 100.0
        );
        println!("  Volatility:        {:>10.6}", metrics.volatility);
        println!("  Sharpe Ratio:      {:>10.4}", metrics.sharpe_ratio);
        println!(
            "  Max Drawdown:      {:>10.4}%",
            metrics.max_drawdown * 100.0
        );
        println!(
            "  Annualized Return: {:>10.4}%",
            metrics.annualized_return * 100.0
        );
        println!();
        println!("{}", "═".repeat(60).blue());
    }

    /// Serialize a backtest summary as pretty JSON.
    pub fn backtest_json(summary: &BacktestSummary) -> Result<String> {
        Ok(serde_json::to_string_pretty(summary)?)
    }

    /// Serialize an optimization result as pretty JSON.
    pub fn optimization_json(result: &OptimizationResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    /// Format percentage change with color.
    fn format_pct_change(pct: f64) -> String {
        if pct >= 0.0 {
            format!("(+{pct:.2}%)").green().to_string()
        } else {
            format!("({pct:.2}%)").red().to_string()
        }
    }
}
