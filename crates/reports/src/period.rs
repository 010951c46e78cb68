use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use warung_core::DomainError;

/// Bucket width for sales summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    /// ISO week, starting Monday.
    Weekly,
    Monthly,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
        }
    }

    /// First day of the bucket containing `date`.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            ReportPeriod::Daily => date,
            ReportPeriod::Weekly => {
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            ReportPeriod::Monthly => date.with_day(1).unwrap_or(date),
        }
    }

    /// Display label for a bucket start: `2026-10-18`, `2026-W42`, `2026-10`.
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            ReportPeriod::Daily => start.format("%Y-%m-%d").to_string(),
            ReportPeriod::Weekly => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            ReportPeriod::Monthly => start.format("%Y-%m").to_string(),
        }
    }
}

impl core::str::FromStr for ReportPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(ReportPeriod::Daily),
            "weekly" => Ok(ReportPeriod::Weekly),
            "monthly" => Ok(ReportPeriod::Monthly),
            other => Err(DomainError::validation(format!(
                "unknown report period '{other}' (expected daily, weekly or monthly)"
            ))),
        }
    }
}

/// Inclusive date filter. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, DomainError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(DomainError::validation(format!(
                    "date range start {f} is after end {t}"
                )));
            }
        }
        Ok(Self { from, to })
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekly_buckets_start_on_monday() {
        // 2026-10-18 is a Sunday.
        assert_eq!(ReportPeriod::Weekly.bucket_start(d(2026, 10, 18)), d(2026, 10, 12));
        assert_eq!(ReportPeriod::Weekly.bucket_start(d(2026, 10, 12)), d(2026, 10, 12));
        assert_eq!(ReportPeriod::Weekly.label(d(2026, 10, 12)), "2026-W42");
    }

    #[test]
    fn iso_week_label_uses_week_year() {
        // 2024-12-30 is the Monday of ISO week 1 of 2025.
        assert_eq!(ReportPeriod::Weekly.label(d(2024, 12, 30)), "2025-W01");
    }

    #[test]
    fn monthly_and_daily_buckets() {
        assert_eq!(ReportPeriod::Monthly.bucket_start(d(2026, 2, 27)), d(2026, 2, 1));
        assert_eq!(ReportPeriod::Monthly.label(d(2026, 2, 1)), "2026-02");
        assert_eq!(ReportPeriod::Daily.label(d(2026, 2, 27)), "2026-02-27");
    }

    #[test]
    fn range_is_inclusive_and_validated() {
        let range = DateRange::new(Some(d(2026, 1, 1)), Some(d(2026, 1, 31))).unwrap();
        assert!(range.contains(d(2026, 1, 1)));
        assert!(range.contains(d(2026, 1, 31)));
        assert!(!range.contains(d(2026, 2, 1)));
        assert!(DateRange::all().contains(d(1999, 12, 31)));

        let err = DateRange::new(Some(d(2026, 2, 1)), Some(d(2026, 1, 1))).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn parses_period_names() {
        assert_eq!("Weekly".parse::<ReportPeriod>().unwrap(), ReportPeriod::Weekly);
        assert!("yearly".parse::<ReportPeriod>().is_err());
    }
}
