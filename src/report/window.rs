use crate::domain::SummaryPeriod;
use crate::error::{TrackerError, TrackerResult};
use chrono::{Datelike, Duration, NaiveDate};

/// Inclusive date window a summary covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub title: String,
}

impl SummaryWindow {
    /// Resolve `period` against `today`.
    ///
    /// - daily: today..today
    /// - weekly: Monday of this week..today
    /// - monthly: first of this month..today
    /// - month: first..last day of the given month
    pub fn resolve(period: SummaryPeriod, today: NaiveDate) -> TrackerResult<Self> {
        let (start, end) = match period {
            SummaryPeriod::Daily => (today, today),
            SummaryPeriod::Weekly => {
                let offset = i64::from(today.weekday().num_days_from_monday());
                (today - Duration::days(offset), today)
            }
            SummaryPeriod::Monthly => (first_of_month(today.year(), today.month())?, today),
            SummaryPeriod::Month { month, year } => {
                let first = first_of_month(year, month)?;
                (first, last_of_month(first)?)
            }
        };

        Ok(Self {
            start,
            end,
            title: period.title(),
        })
    }
}

fn first_of_month(year: i32, month: u32) -> TrackerResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(TrackerError::validation(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TrackerError::validation(format!("Unsupported year: {}", year)))
}

fn last_of_month(first: NaiveDate) -> TrackerResult<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    let next_first = first_of_month(year, month)?;
    Ok(next_first - Duration::days(1))
}
