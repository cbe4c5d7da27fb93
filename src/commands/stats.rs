// src/commands/stats.rs

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::persistence::{self, LogStore};
use crate::report::UsageReport;
use crate::types::AggregationLevel;
use crate::utils::{format_duration_secs, today};
use chrono::NaiveDate;

fn summary_rows(report: &UsageReport, level: AggregationLevel) -> Vec<(String, i64)> {
    let mut rows = match level {
        AggregationLevel::ByApplication => report.by_application(),
        AggregationLevel::Detailed => report
            .entries()
            .iter()
            .map(|e| (e.key.clone(), e.total_secs))
            .collect(),
    };
    // Longest first; ties keep first-seen order.
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}

fn print_summary(rows: &[(String, i64)]) {
    if rows.is_empty() {
        println!("  No activity recorded.");
        return;
    }
    for (name, secs) in rows {
        println!("  {:<40}: {}", name, format_duration_secs(*secs));
    }
}

pub fn execute(
    app_config: &AppConfig,
    day: Option<NaiveDate>,
    level: AggregationLevel,
) -> AppResult<()> {
    let store = LogStore::new(persistence::open_store(app_config)?, app_config.log_key.clone());
    let log = store.load();
    let day = day.unwrap_or_else(today);
    let report = UsageReport::for_day(&log, day);

    println!("\n--- Summary for {} ({}) ---", day, level);
    print_summary(&summary_rows(&report, level));
    println!("  {:<40}: {}", "Total", format_duration_secs(report.total_secs()));
    println!("---------------------------------------------");

    Ok(())
}
