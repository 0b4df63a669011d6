//! Integration tests for cdrstat
//!
//! These tests run the full path: export files on disk → fetch cycle →
//! day aggregation → analysis.

use cdrstat::{
    aggregation::aggregate_by_day,
    aggregation_types::Totals,
    analyzer::Analyzer,
    cli::parse_date_filter,
    filters::Period,
    pipeline::fetch_cycle,
    prediction::{UsageStatus, predict},
    timezone::TimezoneConfig,
    types::{CdrRecord, UsageCounts},
};
use cdrstat_provider_export::ExportDataLoader;
use chrono_tz::Tz;
use std::fs;
use std::path::Path;

fn write_export(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn utc_analyzer() -> Analyzer {
    Analyzer::new(TimezoneConfig {
        tz: Tz::UTC,
        is_utc: true,
    })
}

const SEPTEMBER_SETTLED: &str = r#"{
    "cdrData": [
        {
            "startDate": "2025-09-26T09:10:00+0200",
            "cdrType": "Data",
            "retailCharge": 0.0,
            "duration": "1.208,52 MB",
            "durationInBundle": "1.208,52 MB"
        },
        {
            "startDate": "2025-09-27T14:00:00+0200",
            "cdrType": "Gesprek",
            "retailCharge": 0.25,
            "otherParty": "+31612345678",
            "duration": "39:36"
        },
        {
            "startDate": "2025-09-27T15:30:00+0200",
            "cdrType": "SMS",
            "retailCharge": 0.10,
            "otherParty": "+31612345678",
            "duration": ""
        },
        {
            "startDate": "2025-09-28T08:00:00+0200",
            "cdrType": "Data",
            "retailCharge": 0.0,
            "duration": "150,00 MB"
        }
    ]
}"#;

const SEPTEMBER_PROVISIONAL: &str = r#"{
    "cdrData": [
        {
            "startDate": "2025-09-28T21:45:00+0200",
            "cdrType": "Data",
            "retailCharge": 0.0,
            "duration": "49,50 MB"
        },
        {
            "startDate": "2025-09-28T22:00:00+0200",
            "cdrType": "Gesprek",
            "retailCharge": 0.99,
            "duration": "12:01"
        }
    ]
}"#;

#[tokio::test]
async fn test_full_pipeline_from_export_files() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "settled-2025-09.json", SEPTEMBER_SETTLED);
    write_export(dir.path(), "provisional-current.json", SEPTEMBER_PROVISIONAL);

    let loader = ExportDataLoader::with_root(dir.path());
    let outcome = fetch_cycle(&loader, &Period::new()).await;
    assert!(outcome.is_complete());

    let daily = aggregate_by_day(&outcome.settled, &outcome.provisional);

    // Three distinct days, most recent first
    let days: Vec<&str> = daily.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(days, vec!["2025-09-28", "2025-09-27", "2025-09-26"]);

    // 2025-09-28: settled data + provisional data; the provisional call is ignored
    assert!((daily[0].counts.data_usage_mb - 199.5).abs() < 1e-9);
    assert_eq!(daily[0].counts.call_minutes, 0);
    assert_eq!(daily[0].counts.total_charge, 0.0);

    // 2025-09-27: one call (39:36 rounds up to 40) and one SMS
    assert_eq!(daily[1].counts.call_minutes, 40);
    assert_eq!(daily[1].counts.sms_count, 1);
    assert!((daily[1].counts.total_charge - 0.35).abs() < 1e-9);

    // 2025-09-26: locale-formatted volume with thousands separator
    assert!((daily[2].counts.data_usage_mb - 1208.52).abs() < 1e-9);

    let totals = Totals::from_daily(&daily);
    assert!((totals.counts.data_usage_mb - (1208.52 + 150.0 + 49.5)).abs() < 1e-9);
    assert_eq!(totals.counts.sms_count, 1);
}

#[tokio::test]
async fn test_period_narrows_the_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "settled-2025-09.json", SEPTEMBER_SETTLED);

    let period = Period::new()
        .with_since(parse_date_filter("2025-09-27").unwrap())
        .with_until(parse_date_filter("2025-09-27").unwrap());

    let loader = ExportDataLoader::with_root(dir.path());
    let outcome = fetch_cycle(&loader, &period).await;

    let daily = aggregate_by_day(&outcome.settled, &outcome.provisional);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].day.as_str(), "2025-09-27");
}

#[tokio::test]
async fn test_missing_provisional_exports_mean_empty_source() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "settled-2025-09.json", SEPTEMBER_SETTLED);

    let loader = ExportDataLoader::with_root(dir.path());
    let outcome = fetch_cycle(&loader, &Period::new()).await;

    // No provisional files is not a failure; the source is just empty
    assert!(outcome.is_complete());
    assert!(outcome.provisional.is_empty());

    let daily = aggregate_by_day(&outcome.settled, &outcome.provisional);
    assert_eq!(daily.len(), 3);
}

#[tokio::test]
async fn test_insights_over_fetched_records() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "settled-2025-09.json", SEPTEMBER_SETTLED);

    let loader = ExportDataLoader::with_root(dir.path());
    let outcome = fetch_cycle(&loader, &Period::new()).await;

    let insights = utc_analyzer().analyze(&outcome.settled).unwrap();

    // Two of the four settled records are data sessions, on distinct days
    assert_eq!(insights.recent_days_count, 2);
    assert!((insights.average_daily_usage - (1208.52 + 150.0) / 2.0).abs() < 1e-9);

    // 2025-09-26 is a Friday, 2025-09-28 a Sunday
    assert!((insights.weekday_average - 1208.52).abs() < 1e-9);
    assert!((insights.weekend_average - 150.0).abs() < 1e-9);

    let highest = insights.highest_usage_day.unwrap();
    assert_eq!(highest.data_usage_mb, 1208.52);
}

#[tokio::test]
async fn test_insights_absent_without_data_records() {
    let dir = tempfile::tempdir().unwrap();
    write_export(
        dir.path(),
        "settled-calls-only.json",
        r#"{ "cdrData": [ {
            "startDate": "2025-09-27T14:00:00+0200",
            "cdrType": "Gesprek",
            "retailCharge": 0.25,
            "duration": "05:00"
        } ] }"#,
    );

    let loader = ExportDataLoader::with_root(dir.path());
    let outcome = fetch_cycle(&loader, &Period::new()).await;

    assert!(utc_analyzer().analyze(&outcome.settled).is_none());
}

#[test]
fn test_day_key_and_analyzer_calendar_can_disagree() {
    // 00:30 at +0200 on the 27th is 22:30 UTC on the 26th: the aggregator
    // keys on the literal date while the analyzer files the record in its
    // configured calendar. Near midnight the two disagree.
    let record = CdrRecord {
        start_date: "2025-09-27T00:30:00+0200".to_string(),
        cdr_type: "Data".to_string(),
        retail_charge: 0.0,
        original_retail_charge: None,
        other_party: None,
        a_location: None,
        a_country: None,
        duration: "100 MB".to_string(),
        duration_in_bundle: None,
    };

    let daily = aggregate_by_day(std::slice::from_ref(&record), &[]);
    assert_eq!(daily[0].day.as_str(), "2025-09-27");

    // 00:30+0200 is 22:30 UTC of the previous day
    let insights = utc_analyzer().analyze(std::slice::from_ref(&record)).unwrap();
    assert_eq!(
        insights.daily_usages[0].date,
        chrono::NaiveDate::from_ymd_opt(2025, 9, 26).unwrap()
    );
}

#[test]
fn test_prediction_scenario_matches_dashboard() {
    let prediction = predict(8500.0, 10000.0, 5, 30);

    assert!((prediction.daily_average_gb - 0.34).abs() < 0.001);
    assert!((prediction.predicted_total_gb - 10.2).abs() < 0.001);
    assert_eq!(prediction.status, UsageStatus::Warning);
}

#[test]
fn test_empty_inputs_produce_empty_report() {
    let daily = aggregate_by_day(&[], &[]);
    assert!(daily.is_empty());

    let totals = Totals::from_daily(&daily);
    assert_eq!(totals.counts, UsageCounts::default());
}
