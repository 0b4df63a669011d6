//! cdrstat - Usage analytics and day aggregation for telecom CDR exports

use cdrstat::{
    aggregation::aggregate_by_day_detailed,
    aggregation_types::Totals,
    analyzer::Analyzer,
    cli::{Cli, Command, DailyArgs, parse_date_filter},
    error::Result,
    filters::Period,
    output::get_formatter,
    pipeline::fetch_cycle,
    prediction::predict,
    timezone::TimezoneConfig,
};
use cdrstat_provider_export::ExportDataLoader;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the billing-period filter from CLI date arguments
fn build_period(since: Option<&str>, until: Option<&str>) -> Result<Period> {
    let mut period = Period::new();
    if let Some(since_str) = since {
        period = period.with_since(parse_date_filter(since_str)?);
    }
    if let Some(until_str) = until {
        period = period.with_until(parse_date_filter(until_str)?);
    }
    Ok(period)
}

/// Build the export loader, honoring an explicit path override
async fn build_loader(export_path: Option<std::path::PathBuf>, show_progress: bool) -> Result<ExportDataLoader> {
    let loader = match export_path {
        Some(path) => ExportDataLoader::with_root(path),
        None => ExportDataLoader::new().await?,
    };
    Ok(loader.with_progress(show_progress))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The default is quiet; --verbose raises it.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            tracing_subscriber::EnvFilter::new("cdrstat=info")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let is_tty = is_terminal::is_terminal(std::io::stdout());
    if cli.json || !is_tty {
        colored::control::set_override(false);
    }

    let formatter = get_formatter(cli.json);
    let tz_config = TimezoneConfig::from_args(cli.timezone.as_deref(), cli.utc)?;
    let period = build_period(cli.since.as_deref(), cli.until.as_deref())?;

    match cli.command.unwrap_or(Command::Daily(DailyArgs::default())) {
        Command::Daily(args) => {
            info!("Running daily usage report");
            let show_progress = !cli.json && is_tty;
            let loader = build_loader(cli.export_path, show_progress).await?;

            let outcome = fetch_cycle(&loader, &period).await;
            if outcome.is_empty_failure() {
                warn!("both CDR fetches failed; report covers no records");
            }

            let daily = aggregate_by_day_detailed(&outcome.settled, &outcome.provisional, args.detailed);
            let totals = Totals::from_daily(&daily);
            println!("{}", formatter.format_daily(&daily, &totals));
        }
        Command::Insights => {
            info!(
                "Running usage insights (timezone: {})",
                tz_config.display_name()
            );
            let show_progress = !cli.json && is_tty;
            let loader = build_loader(cli.export_path, show_progress).await?;

            let outcome = fetch_cycle(&loader, &period).await;
            let analyzer = Analyzer::new(tz_config);
            let insights = analyzer.analyze(&outcome.settled);
            println!("{}", formatter.format_insights(insights.as_ref()));
        }
        Command::Predict(args) => {
            let prediction = predict(
                args.used_mb,
                args.total_mb,
                args.days_remaining,
                args.total_days,
            );
            println!("{}", formatter.format_prediction(&prediction));
        }
    }

    Ok(())
}
