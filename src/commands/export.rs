// src/commands/export.rs

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::persistence::{self, LogStore};
use crate::report::UsageReport;
use crate::utils::today;
use chrono::NaiveDate;
use log::debug;

/// Prints the day's usage in the line format downstream reporting parses.
pub fn execute(app_config: &AppConfig, day: Option<NaiveDate>) -> AppResult<()> {
    let store = LogStore::new(persistence::open_store(app_config)?, app_config.log_key.clone());
    let log = store.load();
    let report = UsageReport::for_day(&log, day.unwrap_or_else(today));
    debug!("Exporting {} key(s) for {}", report.entries().len(), report.day());
    print!("{}", report.export_text());
    Ok(())
}
