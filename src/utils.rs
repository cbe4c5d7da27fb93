// src/utils.rs
use chrono::{DateTime, Local, NaiveDate};

/// Formats whole seconds as `H:MM:SS`. Hours are not padded or wrapped, so
/// downstream parsers can rely on exactly two colons.
pub fn format_duration_secs(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Calendar day (local time) an instant falls on.
pub fn local_day(timestamp: &DateTime<Local>) -> NaiveDate {
    timestamp.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_h_mm_ss() {
        assert_eq!(format_duration_secs(0), "0:00:00");
        assert_eq!(format_duration_secs(2), "0:00:02");
        assert_eq!(format_duration_secs(3 * 3600 + 5 * 60 + 9), "3:05:09");
        assert_eq!(format_duration_secs(26 * 3600), "26:00:00");
        assert_eq!(format_duration_secs(-4), "0:00:00");
    }
}
