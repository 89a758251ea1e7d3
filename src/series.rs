//! Raw progress records and the cumulative, day-bucketed XP series.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One XP-granting transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(amount: i64, timestamp: DateTime<Utc>) -> Self {
        Self { amount, timestamp }
    }

    /// Calendar day of the event in UTC.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// One graded exercise attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRecord {
    pub grade: f64,
    pub timestamp: DateTime<Utc>,
    pub category: String,
}

impl ProgressRecord {
    pub fn new(grade: f64, timestamp: DateTime<Utc>, category: impl Into<String>) -> Self {
        Self {
            grade,
            timestamp,
            category: category.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.grade >= 1.0
    }

    pub fn is_failed(&self) -> bool {
        self.grade == 0.0
    }
}

/// One day-bucketed sample of the running XP total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub cumulative: i64,
}

/// Build the cumulative series from events in the order given.
///
/// The running total is carried across the whole input without re-sorting.
/// Each distinct day appears once, at the position it was first seen, and
/// holds the running total after that day's last event. Empty or absent
/// input yields an empty series.
pub fn build_cumulative_series<'a>(events: impl Into<Option<&'a [Event]>>) -> Vec<SeriesPoint> {
    let Some(events) = events.into() else {
        return Vec::new();
    };

    let mut series: Vec<SeriesPoint> = Vec::new();
    let mut slot_for_day: HashMap<NaiveDate, usize> = HashMap::new();
    let mut running = 0i64;

    for event in events {
        running = running.saturating_add(event.amount);
        let date = event.day();
        match slot_for_day.get(&date) {
            Some(&slot) => series[slot].cumulative = running,
            None => {
                slot_for_day.insert(date, series.len());
                series.push(SeriesPoint {
                    date,
                    cumulative: running,
                });
            }
        }
    }

    crate::log::debug!(events = events.len(), days = series.len(), total = running, "built cumulative series");
    series
}

/// Pass/fail tally over a set of progress records.
///
/// `passed` counts grades `>= 1`, `failed` counts grades exactly `0`, and
/// `total` counts every record. Other grades land in neither bucket, so
/// `passed + failed` can be less than `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PassFail {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl PassFail {
    pub fn classify(records: &[ProgressRecord]) -> Self {
        let passed = records.iter().filter(|r| r.is_passed()).count();
        let failed = records.iter().filter(|r| r.is_failed()).count();
        let total = records.len();

        if passed + failed < total {
            crate::log::warn!(
                unclassified = total - passed - failed,
                "progress records with grades outside pass/fail"
            );
        }

        Self { passed, failed, total }
    }

    /// Records counted in neither bucket.
    pub fn unclassified(&self) -> usize {
        self.total.saturating_sub(self.passed).saturating_sub(self.failed)
    }

    /// Percentage of `total` that passed.
    pub fn pass_percentage(&self) -> f64 {
        percentage(self.passed, self.total)
    }

    /// Percentage of `total` that failed.
    pub fn fail_percentage(&self) -> f64 {
        percentage(self.failed, self.total)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn accumulates_per_day() {
        let events = vec![
            Event::new(100, at(1, 10)),
            Event::new(200, at(1, 12)),
            Event::new(150, at(2, 10)),
        ];

        let series = build_cumulative_series(events.as_slice());
        assert_eq!(
            series,
            vec![
                SeriesPoint { date: date(1), cumulative: 300 },
                SeriesPoint { date: date(2), cumulative: 450 },
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let empty: Vec<Event> = Vec::new();
        assert!(build_cumulative_series(empty.as_slice()).is_empty());
    }

    #[test]
    fn absent_input_yields_empty_series() {
        assert!(build_cumulative_series(None).is_empty());
    }

    #[test]
    fn last_point_is_total_for_chronological_input() {
        let events: Vec<Event> = (1..=9)
            .map(|d| Event::new(i64::from(d) * 10, at(d, 9)))
            .collect();
        let total: i64 = events.iter().map(|e| e.amount).sum();

        let series = build_cumulative_series(events.as_slice());
        assert_eq!(series.len(), 9);
        assert_eq!(series.last().map(|p| p.cumulative), Some(total));
        for pair in series.windows(2) {
            assert!(pair[0].date < pair[1].date);
            assert!(pair[0].cumulative <= pair[1].cumulative);
        }
    }

    #[test]
    fn revisited_day_keeps_first_position_and_latest_total() {
        // day1, day2, day1 again: the day1 bucket stays first but holds the
        // total after the third event.
        let events = vec![
            Event::new(10, at(1, 8)),
            Event::new(20, at(2, 8)),
            Event::new(5, at(1, 23)),
        ];

        let series = build_cumulative_series(events.as_slice());
        assert_eq!(
            series,
            vec![
                SeriesPoint { date: date(1), cumulative: 35 },
                SeriesPoint { date: date(2), cumulative: 30 },
            ]
        );
    }

    #[test]
    fn negative_amounts_reduce_running_total() {
        let events = vec![Event::new(100, at(1, 8)), Event::new(-40, at(2, 8))];
        let series = build_cumulative_series(events.as_slice());
        assert_eq!(series[1].cumulative, 60);
    }

    #[test]
    fn running_total_saturates() {
        let events = vec![Event::new(i64::MAX, at(1, 8)), Event::new(10, at(2, 8))];
        let series = build_cumulative_series(events.as_slice());
        assert_eq!(series[1].cumulative, i64::MAX);
    }

    #[test]
    fn day_boundary_is_utc_midnight() {
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let series = build_cumulative_series([Event::new(1, late), Event::new(1, early)].as_slice());
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn classify_pass_fail() {
        let mut records: Vec<ProgressRecord> = (0..7)
            .map(|d| ProgressRecord::new(1.0, at(d + 1, 9), "piscine-go"))
            .collect();
        records.extend((0..3).map(|d| ProgressRecord::new(0.0, at(d + 1, 10), "piscine-go")));

        let tally = PassFail::classify(&records);
        assert_eq!(tally, PassFail { passed: 7, failed: 3, total: 10 });
        assert_eq!(tally.pass_percentage(), 70.0);
        assert_eq!(tally.fail_percentage(), 30.0);
        assert_eq!(tally.unclassified(), 0);
    }

    #[test]
    fn fractional_grades_count_only_toward_total() {
        let records = vec![
            ProgressRecord::new(1.0, at(1, 9), "piscine-js"),
            ProgressRecord::new(0.0, at(1, 10), "piscine-js"),
            ProgressRecord::new(0.5, at(1, 11), "piscine-js"),
            ProgressRecord::new(1.8, at(1, 12), "piscine-js"),
        ];

        let tally = PassFail::classify(&records);
        assert_eq!(tally.passed, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.total, 4);
        assert_eq!(tally.unclassified(), 1);
        assert_eq!(tally.pass_percentage(), 50.0);
        assert_eq!(tally.fail_percentage(), 25.0);
    }

    #[test]
    fn overfull_tally_has_no_unclassified() {
        let tally = PassFail {
            passed: 3,
            failed: 2,
            total: 4,
        };
        assert_eq!(tally.unclassified(), 0);
    }

    #[test]
    fn classify_empty() {
        let tally = PassFail::classify(&[]);
        assert_eq!(tally, PassFail::default());
        assert_eq!(tally.pass_percentage(), 0.0);
    }
}
