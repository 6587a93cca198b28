use crate::error::{TrackerError, TrackerResult};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Storage format for timestamps (ISO-8601, local wall clock, microseconds)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Format used when presenting timestamps for editing
pub const EDIT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted input formats, tried in order. `%.f` also matches a missing fraction.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One tracked task as persisted in the `tasks` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    pub id: i64,
    pub name: String,
    /// Comma-separated, stored exactly as entered
    pub tags: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration_seconds: Option<i64>,
    pub is_running: bool,
}

impl TaskRecord {
    /// Parsed start time, if the stored text is well formed
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.start_time).ok()
    }

    /// Individual trimmed tags of this record
    pub fn tag_list(&self) -> Vec<&str> {
        split_tags(&self.tags).collect()
    }

    /// Seconds elapsed since start, as seen at `now`
    pub fn elapsed_at(&self, now: NaiveDateTime) -> Option<i64> {
        self.started_at().map(|start| elapsed_seconds(start, now))
    }

    /// Start time as shown in the history list ("10/19 14:03")
    pub fn start_display(&self) -> String {
        short_display(&self.start_time)
    }

    /// End time as shown in the history list
    pub fn end_display(&self) -> String {
        match &self.end_time {
            Some(end) => short_display(end),
            None => "Running...".to_string(),
        }
    }

    /// Duration as shown in the history list; zero and missing both read "-"
    pub fn duration_display(&self) -> String {
        match self.duration_seconds {
            Some(secs) if secs != 0 => format_hms(secs),
            _ => "-".to_string(),
        }
    }
}

/// Render a timestamp for storage
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a user- or store-supplied timestamp
pub fn parse_timestamp(value: &str) -> TrackerResult<NaiveDateTime> {
    let trimmed = value.trim();
    INPUT_FORMATS
        .iter()
        .skip(1)
        .fold(
            NaiveDateTime::parse_from_str(trimmed, INPUT_FORMATS[0]),
            |parsed, fmt| parsed.or_else(|_| NaiveDateTime::parse_from_str(trimmed, fmt)),
        )
        .map_err(|source| TrackerError::Parse {
            value: value.to_string(),
            source,
        })
}

/// Whole seconds between two instants, truncated toward zero. Negative when `end < start`.
pub fn elapsed_seconds(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let delta: Duration = end - start;
    delta.num_seconds()
}

/// Split a comma-separated tag string into trimmed, non-empty tags
pub fn split_tags(tags: &str) -> impl Iterator<Item = &str> {
    tags.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

/// Format seconds as "HH:MM:SS" (hours are not wrapped at 24)
pub fn format_hms(total_seconds: i64) -> String {
    let sign = if total_seconds < 0 { "-" } else { "" };
    let secs = total_seconds.unsigned_abs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
}

fn short_display(value: &str) -> String {
    match parse_timestamp(value) {
        Ok(ts) => ts.format("%m/%d %H:%M").to_string(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record(tags: &str, end: Option<&str>, duration: Option<i64>) -> TaskRecord {
        TaskRecord {
            id: 1,
            name: "Write report".to_string(),
            tags: tags.to_string(),
            start_time: "2026-10-19T09:05:00.000000".to_string(),
            end_time: end.map(str::to_string),
            duration_seconds: duration,
            is_running: end.is_none(),
        }
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = at(14, 3, 22);
        assert_eq!(parse_timestamp("2026-10-19T14:03:22").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-19 14:03:22").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2026-10-19 14:03:22 ").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2026-10-19T14:03:22.500000").unwrap(),
            expected + Duration::milliseconds(500)
        );
        assert_eq!(parse_timestamp("2026-10-19 14:03").unwrap(), at(14, 3, 0));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("yesterday at noon").unwrap_err();
        assert!(matches!(err, TrackerError::Parse { ref value, .. } if value == "yesterday at noon"));
        assert!(parse_timestamp("2026-13-40 10:00:00").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_format_timestamp_round_trips() {
        let ts = at(8, 0, 1) + Duration::microseconds(42);
        let text = format_timestamp(ts);
        assert_eq!(text, "2026-10-19T08:00:01.000042");
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
    }

    #[test]
    fn test_elapsed_seconds_truncates() {
        let start = at(10, 0, 0);
        assert_eq!(elapsed_seconds(start, start + Duration::milliseconds(1999)), 1);
        assert_eq!(elapsed_seconds(start, start), 0);
        assert_eq!(elapsed_seconds(start, start - Duration::hours(1)), -3600);
    }

    #[test]
    fn test_split_tags() {
        let tags: Vec<&str> = split_tags(" a, b ,,c ,").collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
        assert_eq!(split_tags("").count(), 0);
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3725), "01:02:05");
        assert_eq!(format_hms(100 * 3600), "100:00:00");
        assert_eq!(format_hms(-61), "-00:01:01");
    }

    #[test]
    fn test_history_display() {
        let running = record("", None, None);
        assert_eq!(running.start_display(), "10/19 09:05");
        assert_eq!(running.end_display(), "Running...");
        assert_eq!(running.duration_display(), "-");

        let done = record("x", Some("2026-10-19T10:35:00.000000"), Some(5400));
        assert_eq!(done.end_display(), "10/19 10:35");
        assert_eq!(done.duration_display(), "01:30:00");

        let instant = record("x", Some("2026-10-19T09:05:00.000000"), Some(0));
        assert_eq!(instant.duration_display(), "-");
    }

    #[test]
    fn test_elapsed_at() {
        let running = record("deep, work", None, None);
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(10, 5, 30)
            .unwrap();
        assert_eq!(running.elapsed_at(now), Some(3630));
        assert_eq!(running.tag_list(), vec!["deep", "work"]);
    }
}
