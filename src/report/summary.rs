use crate::domain::{split_tags, TaskRecord};
use std::collections::HashMap;

/// Totals grouped by task name and by tag
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    /// (task name, seconds), largest first
    pub by_task: Vec<(String, i64)>,
    /// (tag, seconds), largest first
    pub by_tag: Vec<(String, i64)>,
    pub total_seconds: i64,
}

/// Accumulates seconds per key while remembering first-seen order
#[derive(Default)]
struct Totals {
    index: HashMap<String, usize>,
    entries: Vec<(String, i64)>,
}

impl Totals {
    fn add(&mut self, key: &str, seconds: i64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += seconds,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), seconds));
            }
        }
    }

    /// Largest total first; equal totals keep first-seen order (stable sort)
    fn ranked(mut self) -> Vec<(String, i64)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
    }
}

/// Group completed records by name and tag.
///
/// Records without a duration (still running) are skipped. A task with N tags
/// credits its full duration to each of the N tags.
pub fn aggregate(records: &[TaskRecord]) -> Summary {
    let mut by_task = Totals::default();
    let mut by_tag = Totals::default();
    let mut total_seconds = 0;

    for record in records {
        let Some(duration) = record.duration_seconds else {
            continue;
        };

        by_task.add(&record.name, duration);
        total_seconds += duration;

        for tag in split_tags(&record.tags) {
            by_tag.add(tag, duration);
        }
    }

    Summary {
        by_task: by_task.ranked(),
        by_tag: by_tag.ranked(),
        total_seconds,
    }
}

/// Seconds as hours with two decimals ("1.50")
pub fn format_hours(seconds: i64) -> String {
    format!("{:.2}", seconds as f64 / 3600.0)
}

/// Render the plain-text summary report for `records`
pub fn generate_summary(records: &[TaskRecord], title: &str) -> String {
    if records.is_empty() {
        return format!("No tasks found for {}.", title.to_lowercase());
    }

    let summary = aggregate(records);
    let mut lines = Vec::new();

    lines.push(format!("{}\n{}\n", title, "=".repeat(title.chars().count())));

    lines.push("BY TASK:".to_string());
    for (name, seconds) in &summary.by_task {
        lines.push(format!("  {}: {}h", name, format_hours(*seconds)));
    }

    if !summary.by_tag.is_empty() {
        lines.push("\nBY TAG:".to_string());
        for (tag, seconds) in &summary.by_tag {
            lines.push(format!("  {}: {}h", tag, format_hours(*seconds)));
        }
    }

    lines.push(format!("\nTOTAL: {} hours", format_hours(summary.total_seconds)));

    lines.join("\n")
}
