//! CLI interface for cdrstat
//!
//! This module defines the command-line interface using clap.
//!
//! # Example
//!
//! ```bash
//! # Daily usage for a September billing cycle
//! cdrstat daily --since 2025-09-01 --until 2025-09-30
//!
//! # Usage insights as JSON
//! cdrstat insights --json
//!
//! # Allowance prediction for the current cycle
//! cdrstat predict --used-mb 8500 --total-mb 10000 --days-remaining 5 --total-days 30
//! ```

use cdrstat_core::error::{CdrstatError, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Analyze telecom CDR usage exports
#[derive(Parser, Debug, Clone)]
#[command(name = "cdrstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Filter by start date (YYYY-MM-DD or YYYY-MM)
    #[arg(long, global = true)]
    pub since: Option<String>,

    /// Filter by end date (YYYY-MM-DD or YYYY-MM)
    #[arg(long, global = true)]
    pub until: Option<String>,

    /// Timezone for analyzer calendar grouping (e.g. "Europe/Amsterdam", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC for analyzer calendar grouping (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Directory holding CDR export files (overrides discovery)
    #[arg(long, env = "CDRSTAT_EXPORT_PATH", global = true)]
    pub export_path: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments for the daily report
#[derive(Args, Debug, Clone, Default)]
pub struct DailyArgs {
    /// List the contributing records under each day
    #[arg(long, short = 'd')]
    pub detailed: bool,
}

/// Arguments for the predict command
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Data used so far this cycle, in MB
    #[arg(long)]
    pub used_mb: f64,

    /// Period allowance, in MB
    #[arg(long)]
    pub total_mb: f64,

    /// Days remaining in the billing period
    #[arg(long)]
    pub days_remaining: u32,

    /// Total days in the billing period
    #[arg(long)]
    pub total_days: u32,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show per-day aggregated usage (settled + provisional)
    Daily(DailyArgs),
    /// Show statistical usage insights (trend, outliers, averages)
    Insights,
    /// Predict whether the allowance lasts the billing period
    Predict(PredictArgs),
}

/// Parse date filter from string
///
/// Accepts dates in YYYY-MM-DD or YYYY-MM format.
/// For YYYY-MM format, defaults to the first day of the month.
///
/// # Example
///
/// ```
/// use cdrstat::cli::parse_date_filter;
/// use chrono::Datelike;
///
/// let date = parse_date_filter("2025-09-15").unwrap();
/// assert_eq!(date.day(), 15);
///
/// let date = parse_date_filter("2025-09").unwrap();
/// assert_eq!(date.day(), 1);
/// ```
pub fn parse_date_filter(date_str: &str) -> Result<chrono::NaiveDate> {
    // Try YYYY-MM-DD format first
    if let Ok(date) = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    // Try YYYY-MM format (convert to first day of month)
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() == 2 {
        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| CdrstatError::InvalidDate(format!("Invalid year in '{date_str}'")))?;
        let month = parts[1]
            .parse::<u32>()
            .map_err(|_| CdrstatError::InvalidDate(format!("Invalid month in '{date_str}'")))?;

        if !(1..=12).contains(&month) {
            return Err(CdrstatError::InvalidDate(format!(
                "Month must be between 1-12, got {month}"
            )));
        }

        chrono::NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CdrstatError::InvalidDate(format!("Invalid date: {date_str}")))
    } else {
        Err(CdrstatError::InvalidDate(format!(
            "Invalid date format '{date_str}', expected YYYY-MM-DD or YYYY-MM"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_cli_parsing() {
        // Global JSON flag, no command
        let cli = Cli::parse_from(["cdrstat", "--json"]);
        assert!(cli.json);
        assert!(cli.command.is_none());

        // Daily with detail flag
        let cli = Cli::parse_from(["cdrstat", "daily", "--detailed"]);
        match &cli.command {
            Some(Command::Daily(args)) => assert!(args.detailed),
            _ => panic!("Expected Daily command"),
        }
    }

    #[test]
    fn test_predict_arguments() {
        let cli = Cli::parse_from([
            "cdrstat",
            "predict",
            "--used-mb",
            "8500",
            "--total-mb",
            "10000",
            "--days-remaining",
            "5",
            "--total-days",
            "30",
        ]);

        match &cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.used_mb, 8500.0);
                assert_eq!(args.total_mb, 10000.0);
                assert_eq!(args.days_remaining, 5);
                assert_eq!(args.total_days, 30);
            }
            _ => panic!("Expected Predict command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cdrstat", "insights", "--utc", "--json"]);
        assert!(cli.utc);
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Command::Insights)));
    }

    #[test]
    fn test_date_parsing() {
        let date = parse_date_filter("2025-09-15").unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 9);
        assert_eq!(date.day(), 15);

        // YYYY-MM defaults to the first of the month
        let date = parse_date_filter("2025-09").unwrap();
        assert_eq!(date.day(), 1);

        assert!(parse_date_filter("invalid").is_err());
        assert!(parse_date_filter("2025-13").is_err());
        assert!(parse_date_filter("2025").is_err());
    }
}
