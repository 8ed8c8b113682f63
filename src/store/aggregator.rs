//! Statistics aggregation utilities.
//!
//! Provides functions for folding a list of viewing records into
//! time-bucketed totals and a summary report. Every function has a
//! `_in` form taking the time zone used for calendar fields and a
//! short form using the host's local zone.

use super::splitter::{month_key, split_at_midnight, split_by_hour, split_by_weekday};
use super::types::{
    HourlyWatchTime, LongestDay, SeriesStats, ViewingRecord, WatchStatistics, WeeklyWatchTime,
    DAYS_PER_WEEK, HOURS_PER_DAY,
};
use chrono::{Datelike, Local, TimeZone};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Watch time grouped by series, with movies kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesBreakdown {
    /// All records without a series.
    pub movies: SeriesStats,

    /// Episode records keyed by series id.
    pub series: BTreeMap<i64, SeriesStats>,
}

/// Sum of watched seconds across all records, saturating at `u64::MAX`.
pub fn total_watch_time(records: &[ViewingRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.duration_secs))
}

/// Number of distinct device types.
pub fn device_count(records: &[ViewingRecord]) -> u32 {
    records
        .iter()
        .map(|r| r.device_type)
        .collect::<HashSet<_>>()
        .len() as u32
}

/// Groups records by series.
pub fn series_breakdown(records: &[ViewingRecord]) -> SeriesBreakdown {
    let mut breakdown = SeriesBreakdown::default();

    for record in records {
        match record.series_id {
            Some(id) => breakdown.series.entry(id).or_default().add_record(record),
            None => breakdown.movies.add_record(record),
        }
    }

    breakdown
}

/// Watch time per `YYYY-MM` month, sorted by month.
///
/// Every month between the first and last start is present, zero if
/// nothing was watched. A record counts entirely toward its start month.
pub fn monthly_watch_time_in<Tz: TimeZone>(records: &[ViewingRecord], tz: &Tz) -> Vec<(String, u64)> {
    let (Some(first), Some(last)) = (
        records.iter().map(|r| r.start).min(),
        records.iter().map(|r| r.start).max(),
    ) else {
        return Vec::new();
    };

    let first = first.with_timezone(tz);
    let last = last.with_timezone(tz);

    let mut months: BTreeMap<String, u64> = BTreeMap::new();
    let (mut year, mut month) = (first.year(), first.month());
    while (year, month) <= (last.year(), last.month()) {
        months.insert(format!("{:04}-{:02}", year, month), 0);
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    for record in records {
        let key = month_key(&record.start.with_timezone(tz));
        let total = months.entry(key).or_insert(0);
        *total = total.saturating_add(record.duration_secs);
    }

    months.into_iter().collect()
}

/// Watch time per day of week, 0 = Sunday.
pub fn weekly_watch_time_in<Tz: TimeZone>(records: &[ViewingRecord], tz: &Tz) -> WeeklyWatchTime {
    let mut days = [0u64; DAYS_PER_WEEK];

    for record in records {
        split_by_weekday(&record.start.with_timezone(tz), record.duration_secs)
            .fold_into(&mut days);
    }

    days
}

/// Watch time per hour of day.
pub fn hourly_watch_time_in<Tz: TimeZone>(records: &[ViewingRecord], tz: &Tz) -> HourlyWatchTime {
    let mut hours = [0u64; HOURS_PER_DAY];

    for record in records {
        split_by_hour(&record.start.with_timezone(tz), record.duration_secs)
            .fold_into(&mut hours);
    }

    hours
}

/// Finds the calendar day with the most watch time.
///
/// Ties go to the day first seen while walking the records.
pub fn longest_single_day_in<Tz: TimeZone>(records: &[ViewingRecord], tz: &Tz) -> LongestDay {
    let mut by_day: IndexMap<String, u64> = IndexMap::new();

    for record in records {
        let split = split_at_midnight(&record.start.with_timezone(tz), record.duration_secs);
        for (key, secs) in split.pieces() {
            let total = by_day.entry(key.to_string()).or_insert(0);
            *total = total.saturating_add(secs);
        }
    }

    let mut longest = LongestDay::default();
    for (date, time) in by_day {
        if time > longest.time {
            longest = LongestDay {
                date: Some(date),
                time,
            };
        }
    }

    longest
}

/// Builds the summary statistics for a list of records.
pub fn compute_statistics_in<Tz: TimeZone>(records: &[ViewingRecord], tz: &Tz) -> WatchStatistics {
    let breakdown = series_breakdown(records);
    let longest = longest_single_day_in(records, tz);

    let stats = WatchStatistics {
        total_count: records.len() as u32,
        total_watch_time: total_watch_time(records),
        series_count: breakdown.series.len() as u32,
        series_episode_count: breakdown.series.values().map(|s| s.count).sum(),
        series_watch_time: breakdown
            .series
            .values()
            .fold(0u64, |acc, s| acc.saturating_add(s.total_time)),
        movie_count: breakdown.movies.count,
        movie_watch_time: breakdown.movies.total_time,
        longest_day: longest.date,
        longest_day_watch_time: longest.time,
        device_count: device_count(records),
    };

    tracing::debug!(
        records = stats.total_count,
        total_secs = stats.total_watch_time,
        series = stats.series_count,
        movies = stats.movie_count,
        "Computed viewing statistics"
    );

    stats
}

/// [`monthly_watch_time_in`] using the host's local zone.
pub fn monthly_watch_time(records: &[ViewingRecord]) -> Vec<(String, u64)> {
    monthly_watch_time_in(records, &Local)
}

/// [`weekly_watch_time_in`] using the host's local zone.
pub fn weekly_watch_time(records: &[ViewingRecord]) -> WeeklyWatchTime {
    weekly_watch_time_in(records, &Local)
}

/// [`hourly_watch_time_in`] using the host's local zone.
pub fn hourly_watch_time(records: &[ViewingRecord]) -> HourlyWatchTime {
    hourly_watch_time_in(records, &Local)
}

/// [`longest_single_day_in`] using the host's local zone.
pub fn longest_single_day(records: &[ViewingRecord]) -> LongestDay {
    longest_single_day_in(records, &Local)
}

/// [`compute_statistics_in`] using the host's local zone.
pub fn compute_statistics(records: &[ViewingRecord]) -> WatchStatistics {
    compute_statistics_in(records, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn tz() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn create_test_record(
        y: i32,
        mo: u32,
        d: u32,
        h: u32,
        mi: u32,
        duration_secs: u64,
    ) -> ViewingRecord {
        let start = tz()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc);
        ViewingRecord::new(1, "Test", start, duration_secs)
    }

    #[test]
    fn test_monthly_empty() {
        assert!(monthly_watch_time_in(&[], &tz()).is_empty());
    }

    #[test]
    fn test_monthly_single_record() {
        let records = vec![create_test_record(2023, 11, 2, 20, 0, 4200)];
        assert_eq!(
            monthly_watch_time_in(&records, &tz()),
            vec![("2023-11".to_string(), 4200)]
        );
    }

    #[test]
    fn test_monthly_fills_gaps_across_year_end() {
        let records = vec![
            create_test_record(2024, 2, 1, 9, 0, 100),
            create_test_record(2023, 11, 30, 9, 0, 50),
        ];

        let months = monthly_watch_time_in(&records, &tz());

        assert_eq!(
            months,
            vec![
                ("2023-11".to_string(), 50),
                ("2023-12".to_string(), 0),
                ("2024-01".to_string(), 0),
                ("2024-02".to_string(), 100),
            ]
        );
    }

    #[test]
    fn test_monthly_does_not_split_across_months() {
        let records = vec![create_test_record(2024, 1, 31, 23, 0, 7200)];
        assert_eq!(
            monthly_watch_time_in(&records, &tz()),
            vec![("2024-01".to_string(), 7200)]
        );
    }

    #[test]
    fn test_weekly_sunday_night() {
        // 2024-03-03 is a Sunday
        let records = vec![create_test_record(2024, 3, 3, 23, 0, 7200)];
        let week = weekly_watch_time_in(&records, &tz());

        assert_eq!(week[0], 3600);
        assert_eq!(week[1], 3600);
        assert_eq!(week.iter().sum::<u64>(), 7200);
    }

    #[test]
    fn test_weekly_order_independent() {
        let mut records = vec![
            create_test_record(2024, 3, 3, 23, 0, 7200),
            create_test_record(2024, 3, 6, 12, 0, 1800),
            create_test_record(2024, 3, 9, 22, 30, 9000),
        ];
        let forward = weekly_watch_time_in(&records, &tz());
        records.reverse();

        assert_eq!(weekly_watch_time_in(&records, &tz()), forward);
    }

    #[test]
    fn test_hourly_wraps_midnight() {
        let records = vec![create_test_record(2024, 3, 3, 23, 40, 5000)];
        let hours = hourly_watch_time_in(&records, &tz());

        assert_eq!(hours[23], 3600);
        assert_eq!(hours[0], 1400);
        assert_eq!(hours.iter().sum::<u64>(), 5000);
    }

    #[test]
    fn test_longest_day_sums_same_day() {
        let records = vec![
            create_test_record(2024, 5, 4, 10, 0, 1000),
            create_test_record(2024, 5, 4, 18, 0, 2000),
            create_test_record(2024, 5, 5, 18, 0, 2500),
        ];

        let longest = longest_single_day_in(&records, &tz());

        assert_eq!(longest.date.as_deref(), Some("2024-5-4"));
        assert_eq!(longest.time, 3000);
    }

    #[test]
    fn test_longest_day_tie_keeps_first_seen() {
        let records = vec![
            create_test_record(2024, 5, 6, 10, 0, 600),
            create_test_record(2024, 5, 4, 10, 0, 600),
        ];

        let longest = longest_single_day_in(&records, &tz());
        assert_eq!(longest.date.as_deref(), Some("2024-5-6"));
    }

    #[test]
    fn test_longest_day_empty_and_zero() {
        assert_eq!(longest_single_day_in(&[], &tz()), LongestDay::default());

        let records = vec![create_test_record(2024, 5, 4, 10, 0, 0)];
        let longest = longest_single_day_in(&records, &tz());
        assert_eq!(longest.date, None);
        assert_eq!(longest.time, 0);
    }

    #[test]
    fn test_longest_day_split_at_midnight() {
        let records = vec![
            create_test_record(2024, 5, 4, 23, 0, 3 * 3600),
            create_test_record(2024, 5, 4, 12, 0, 1800),
        ];

        let longest = longest_single_day_in(&records, &tz());
        assert_eq!(longest.date.as_deref(), Some("2024-5-5"));
        assert_eq!(longest.time, 7200);
    }

    #[test]
    fn test_compute_statistics() {
        let records = vec![
            create_test_record(2024, 5, 4, 10, 0, 1000).with_series(7).with_device(1),
            create_test_record(2024, 5, 4, 11, 0, 1500).with_series(7).with_device(2),
            create_test_record(2024, 5, 5, 11, 0, 500).with_series(8).with_device(1),
            create_test_record(2024, 5, 6, 20, 0, 6000).with_device(1),
            create_test_record(2024, 5, 6, 22, 0, 0).with_device(1),
        ];

        let stats = compute_statistics_in(&records, &tz());

        assert_eq!(stats.total_count, 5);
        assert_eq!(stats.total_watch_time, 9000);
        assert_eq!(stats.series_count, 2);
        assert_eq!(stats.series_episode_count, 3);
        assert_eq!(stats.series_watch_time, 3000);
        assert_eq!(stats.movie_count, 2);
        assert_eq!(stats.movie_watch_time, 6000);
        assert_eq!(stats.longest_day.as_deref(), Some("2024-5-6"));
        assert_eq!(stats.longest_day_watch_time, 6000);
        assert_eq!(stats.device_count, 2);
    }

    #[test]
    fn test_total_independent_of_bucketing() {
        let records = vec![
            create_test_record(2024, 1, 31, 23, 30, 90_000),
            create_test_record(2024, 2, 29, 23, 59, 61),
        ];

        let total = compute_statistics_in(&records, &tz()).total_watch_time;
        assert_eq!(total, 90_061);
        assert_eq!(weekly_watch_time_in(&records, &tz()).iter().sum::<u64>(), total);
        assert_eq!(hourly_watch_time_in(&records, &tz()).iter().sum::<u64>(), total);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let records = vec![
            create_test_record(2024, 3, 3, 23, 0, i64::MAX as u64),
            create_test_record(2024, 3, 3, 23, 0, i64::MAX as u64),
            create_test_record(2024, 3, 3, 23, 0, i64::MAX as u64).with_series(4),
        ];

        let stats = compute_statistics_in(&records, &tz());
        assert_eq!(stats.total_watch_time, u64::MAX);
        assert_eq!(stats.movie_watch_time, u64::MAX - 1);
        assert_eq!(stats.longest_day_watch_time, u64::MAX);

        let months = monthly_watch_time_in(&records, &tz());
        assert_eq!(months, vec![("2024-03".to_string(), u64::MAX)]);

        let hours = hourly_watch_time_in(&records, &tz());
        assert!(hours.iter().all(|&secs| secs > 0));
        let days = weekly_watch_time_in(&records, &tz());
        assert!(days.iter().all(|&secs| secs > 0));
    }

    #[test]
    fn test_aggregators_idempotent() {
        let records = vec![
            create_test_record(2024, 3, 3, 23, 0, 7200),
            create_test_record(2024, 4, 1, 8, 15, 4321),
        ];

        assert_eq!(
            monthly_watch_time_in(&records, &tz()),
            monthly_watch_time_in(&records, &tz())
        );
        assert_eq!(
            compute_statistics_in(&records, &tz()),
            compute_statistics_in(&records, &tz())
        );
    }
}
