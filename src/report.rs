// src/report.rs
use crate::types::ActivityLog;
use crate::utils::{format_duration_secs, local_day};
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// `"<application>: <window label>"`
    pub key: String,
    pub app_name: String,
    pub total_secs: i64,
}

/// Per application/window totals for one calendar day, in the order each
/// key first appeared in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReport {
    day: NaiveDate,
    entries: Vec<ReportEntry>,
}

impl UsageReport {
    /// Sums closed intervals whose start falls on `day` (local time). An
    /// interval running past midnight counts entirely toward its start day.
    pub fn for_day(log: &ActivityLog, day: NaiveDate) -> Self {
        let mut entries: Vec<ReportEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for interval in log.intervals().iter().filter(|i| local_day(&i.start_time) == day) {
            let key = interval.report_key();
            match index.get(&key) {
                Some(&pos) => entries[pos].total_secs += interval.duration,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push(ReportEntry {
                        key,
                        app_name: interval.app_name.clone(),
                        total_secs: interval.duration,
                    });
                }
            }
        }

        Self { day, entries }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.total_secs)
    }

    pub fn total_secs(&self) -> i64 {
        self.entries.iter().map(|e| e.total_secs).sum()
    }

    pub fn to_map(&self) -> HashMap<String, i64> {
        self.entries.iter().map(|e| (e.key.clone(), e.total_secs)).collect()
    }

    /// Totals per application only, first-seen order.
    pub fn by_application(&self) -> Vec<(String, i64)> {
        let mut totals: Vec<(String, i64)> = Vec::new();
        for entry in &self.entries {
            match totals.iter_mut().find(|(app, _)| *app == entry.app_name) {
                Some((_, secs)) => *secs += entry.total_secs,
                None => totals.push((entry.app_name.clone(), entry.total_secs)),
            }
        }
        totals
    }

    /// One `"<key>: <H>:<MM>:<SS>"` line per key. Consumers split each line
    /// on its last `": "`, so the duration must stay the final field.
    pub fn export_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}\n", e.key, format_duration_secs(e.total_secs)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, interval, on};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn sums_repeated_keys_and_keeps_first_seen_order() {
        let log: ActivityLog = vec![
            interval("VSCode", "VSCode - main.py", at(9, 0, 0), at(9, 0, 30)),
            interval("Chrome", "Chrome - docs.rs", at(9, 0, 30), at(9, 1, 0)),
            interval("VSCode", "VSCode - main.py", at(9, 1, 0), at(9, 1, 45)),
            interval("VSCode", "VSCode - lib.rs", at(9, 1, 45), at(9, 2, 0)),
        ]
        .into_iter()
        .collect();

        let report = UsageReport::for_day(&log, day());
        let keys: Vec<&str> = report.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            ["VSCode: VSCode - main.py", "Chrome: Chrome - docs.rs", "VSCode: VSCode - lib.rs"]
        );
        assert_eq!(report.get("VSCode: VSCode - main.py"), Some(75));
        assert_eq!(report.total_secs(), 120);
        assert_eq!(
            report.by_application(),
            vec![("VSCode".to_string(), 90), ("Chrome".to_string(), 30)]
        );
    }

    #[test]
    fn only_counts_intervals_started_on_the_day() {
        let log: ActivityLog = vec![
            interval("A", "A", on(2024, 3, 14, 23, 59, 0), on(2024, 3, 15, 0, 10, 0)),
            interval("B", "B", on(2024, 3, 15, 23, 58, 0), on(2024, 3, 16, 0, 2, 0)),
            interval("C", "C", on(2024, 3, 16, 0, 2, 0), on(2024, 3, 16, 0, 3, 0)),
        ]
        .into_iter()
        .collect();

        let report = UsageReport::for_day(&log, day());
        assert_eq!(report.entries().len(), 1);
        // The whole interval stays on its start day, including minutes after midnight.
        assert_eq!(report.get("B: B"), Some(240));
        assert_eq!(report.day(), day());
    }

    #[test]
    fn export_lines_split_on_last_separator() {
        let log: ActivityLog = vec![
            interval("VSCode", "VSCode - main.py", at(10, 0, 0), at(10, 0, 2)),
            interval("Chrome", "Chrome - https://a.io/x: y", at(10, 0, 2), at(11, 2, 5)),
        ]
        .into_iter()
        .collect();

        let text = UsageReport::for_day(&log, day()).export_text();
        assert_eq!(
            text,
            "VSCode: VSCode - main.py: 0:00:02\nChrome: Chrome - https://a.io/x: y: 1:02:03\n"
        );

        let parsed: Vec<(&str, &str)> = text
            .lines()
            .map(|line| line.rsplit_once(": ").unwrap())
            .collect();
        assert_eq!(parsed[1], ("Chrome: Chrome - https://a.io/x: y", "1:02:03"));
    }

    #[test]
    fn empty_day_yields_empty_report() {
        let report = UsageReport::for_day(&ActivityLog::new(), day());
        assert!(report.is_empty());
        assert_eq!(report.export_text(), "");
    }
}
