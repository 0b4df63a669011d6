//! Output formatting for cdrstat reports
//!
//! Formatters for displaying aggregated usage in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use cdrstat::output::get_formatter;
//! use cdrstat::aggregation_types::{DayAggregatedUsage, Totals};
//! use cdrstat::types::{DayKey, UsageCounts};
//!
//! let daily = vec![DayAggregatedUsage {
//!     day: DayKey::new("2025-09-28"),
//!     counts: UsageCounts::new(150.0, 6, 1, 0.35),
//!     entries: None,
//! }];
//! let totals = Totals::from_daily(&daily);
//!
//! let formatter = get_formatter(false);
//! println!("{}", formatter.format_daily(&daily, &totals));
//! ```

use cdrstat_core::aggregation_types::{DailyUsage, DayAggregatedUsage, Totals, UsageInsights, UsageTrend};
use colored::Colorize;
use prettytable::{Table, format, row};
use serde_json::json;

use crate::prediction::{UsagePrediction, UsageStatus};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format per-day aggregated usage with totals
    fn format_daily(&self, data: &[DayAggregatedUsage], totals: &Totals) -> String;

    /// Format usage insights; `None` means no insights are available, which
    /// is a first-class outcome and renders as such
    fn format_insights(&self, insights: Option<&UsageInsights>) -> String;

    /// Format a billing-cycle prediction
    fn format_prediction(&self, prediction: &UsagePrediction) -> String;
}

/// Get the appropriate formatter
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}

/// Table formatter for human-readable output
pub struct TableFormatter;

impl TableFormatter {
    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    /// Format a data volume in MB
    fn format_mb(mb: f64) -> String {
        format!("{mb:.2}")
    }

    /// Format a charge amount
    fn format_currency(amount: f64) -> String {
        format!("€{amount:.2}")
    }

    fn trend_label(trend: UsageTrend) -> String {
        match trend {
            UsageTrend::Increasing => format!("{} ↑", "increasing".yellow()),
            UsageTrend::Decreasing => format!("{} ↓", "decreasing".green()),
            UsageTrend::Stable => format!("{} →", "stable"),
        }
    }

    fn status_label(status: UsageStatus) -> String {
        match status {
            UsageStatus::OnTrack => "on track".green().to_string(),
            UsageStatus::Warning => "warning".yellow().to_string(),
            UsageStatus::OverLimit => "over limit".red().to_string(),
        }
    }

    fn format_day_line(day: &DailyUsage) -> String {
        format!("{} ({} MB)", day.date.format("%Y-%m-%d"), Self::format_mb(day.data_usage_mb))
    }
}

impl OutputFormatter for TableFormatter {
    fn format_daily(&self, data: &[DayAggregatedUsage], totals: &Totals) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        table.set_titles(row![
            b -> "Date",
            b -> "Data (MB)",
            b -> "Calls (min)",
            b -> "SMS",
            b -> "Charge"
        ]);

        for day in data {
            table.add_row(row![
                day.day.as_str(),
                r -> Self::format_mb(day.counts.data_usage_mb),
                r -> Self::format_number(day.counts.call_minutes),
                r -> Self::format_number(day.counts.sms_count),
                r -> Self::format_currency(day.counts.total_charge)
            ]);
        }

        table.add_row(row![
            b -> "TOTAL",
            rb -> Self::format_mb(totals.counts.data_usage_mb),
            rb -> Self::format_number(totals.counts.call_minutes),
            rb -> Self::format_number(totals.counts.sms_count),
            rb -> Self::format_currency(totals.counts.total_charge)
        ]);

        let mut output = table.to_string();

        // Detailed mode: list the contributing records under the table
        for day in data {
            if let Some(entries) = &day.entries {
                output.push_str(&format!("\n{}\n", day.day.as_str().bold()));
                for entry in entries {
                    output.push_str(&format!(
                        "  {}[{}]  {}  {}  {}\n",
                        entry.source,
                        entry.index,
                        entry.start_date,
                        entry.cdr_type,
                        Self::format_currency(entry.charge)
                    ));
                }
            }
        }

        output
    }

    fn format_insights(&self, insights: Option<&UsageInsights>) -> String {
        let Some(insights) = insights else {
            return "No usage insights available (no data records in the selected period)"
                .to_string();
        };

        let mut lines = Vec::new();
        lines.push(format!("Days analyzed:       {}", insights.recent_days_count));
        lines.push(format!(
            "Average daily usage: {} MB",
            Self::format_mb(insights.average_daily_usage)
        ));
        lines.push(format!(
            "Weekday average:     {} MB",
            Self::format_mb(insights.weekday_average)
        ));
        lines.push(format!(
            "Weekend average:     {} MB",
            Self::format_mb(insights.weekend_average)
        ));

        if let Some(day) = &insights.highest_usage_day {
            lines.push(format!("Highest usage day:   {}", Self::format_day_line(day)));
        }
        if let Some(day) = &insights.lowest_usage_day {
            lines.push(format!("Lowest usage day:    {}", Self::format_day_line(day)));
        }

        lines.push(format!("Trend:               {}", Self::trend_label(insights.trend)));

        if insights.outliers.is_empty() {
            lines.push("Outliers:            none".to_string());
        } else {
            lines.push("Outliers:".to_string());
            for day in &insights.outliers {
                lines.push(format!("  {}", Self::format_day_line(day)));
            }
        }

        lines.join("\n")
    }

    fn format_prediction(&self, prediction: &UsagePrediction) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "Daily average:   {:.2} GB",
            prediction.daily_average_gb
        ));
        lines.push(format!(
            "Predicted total: {:.1} GB",
            prediction.predicted_total_gb
        ));
        lines.push(format!(
            "Daily budget:    {:.2} GB",
            prediction.daily_budget_gb
        ));
        lines.push(format!(
            "Status:          {}",
            Self::status_label(prediction.status)
        ));
        lines.join("\n")
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn to_pretty(value: serde_json::Value) -> String {
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_daily(&self, data: &[DayAggregatedUsage], totals: &Totals) -> String {
        Self::to_pretty(json!({
            "daily": data,
            "totals": totals,
        }))
    }

    fn format_insights(&self, insights: Option<&UsageInsights>) -> String {
        Self::to_pretty(json!({
            "insights": insights,
        }))
    }

    fn format_prediction(&self, prediction: &UsagePrediction) -> String {
        Self::to_pretty(json!({
            "prediction": prediction,
        }))
    }
}
