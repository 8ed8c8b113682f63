//! Viewing history holding normalized records.
//!
//! Wraps an immutable list of viewing records together with the time
//! zone used to read their calendar fields. Every query folds the
//! records afresh; nothing is cached between calls.

use super::aggregator::{
    compute_statistics_in, hourly_watch_time_in, longest_single_day_in, monthly_watch_time_in,
    series_breakdown, weekly_watch_time_in, SeriesBreakdown,
};
use super::types::{HourlyWatchTime, LongestDay, ViewingRecord, WatchStatistics, WeeklyWatchTime};
use crate::report::WatchReport;
use chrono::{Local, TimeZone};

/// A list of viewing records interpreted in one time zone.
#[derive(Debug, Clone)]
pub struct ViewingHistory<Tz: TimeZone = Local> {
    records: Vec<ViewingRecord>,
    tz: Tz,
}

impl ViewingHistory<Local> {
    /// Creates a history read in the host's local zone.
    pub fn new(records: Vec<ViewingRecord>) -> Self {
        Self::with_timezone(records, Local)
    }
}

impl<Tz: TimeZone> ViewingHistory<Tz> {
    /// Creates a history read in `tz`.
    pub fn with_timezone(records: Vec<ViewingRecord>, tz: Tz) -> Self {
        Self { records, tz }
    }

    /// Returns the records in their original order.
    pub fn records(&self) -> &[ViewingRecord] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the history holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn monthly_watch_time(&self) -> Vec<(String, u64)> {
        monthly_watch_time_in(&self.records, &self.tz)
    }

    pub fn weekly_watch_time(&self) -> WeeklyWatchTime {
        weekly_watch_time_in(&self.records, &self.tz)
    }

    pub fn hourly_watch_time(&self) -> HourlyWatchTime {
        hourly_watch_time_in(&self.records, &self.tz)
    }

    pub fn longest_day(&self) -> LongestDay {
        longest_single_day_in(&self.records, &self.tz)
    }

    pub fn series_breakdown(&self) -> SeriesBreakdown {
        series_breakdown(&self.records)
    }

    pub fn statistics(&self) -> WatchStatistics {
        compute_statistics_in(&self.records, &self.tz)
    }

    /// Runs every aggregator and bundles the results.
    pub fn summarize(&self) -> WatchReport {
        tracing::info!(records = self.records.len(), "Summarizing viewing history");

        WatchReport {
            statistics: self.statistics(),
            monthly: self.monthly_watch_time(),
            weekly: self.weekly_watch_time(),
            hourly: self.hourly_watch_time(),
            series: self.series_breakdown(),
        }
    }
}
