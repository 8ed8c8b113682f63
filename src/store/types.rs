//! Data types for viewing statistics.
//!
//! Defines the normalized viewing record consumed by the aggregators
//! and the plain result structures they produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of day-of-week buckets (0 = Sunday).
pub const DAYS_PER_WEEK: usize = 7;

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: usize = 24;

/// Watch time per day of week, indexed 0 = Sunday through 6 = Saturday.
pub type WeeklyWatchTime = [u64; DAYS_PER_WEEK];

/// Watch time per hour of day, indexed 0 through 23.
pub type HourlyWatchTime = [u64; HOURS_PER_DAY];

/// Represents a single watched playback session.
///
/// A session starts when playback began (or resumed) and covers
/// `duration_secs` of watched time from that instant onwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingRecord {
    /// Opaque identifier of the watched title.
    pub movie_id: i64,

    /// Display title.
    pub title: String,

    /// When playback started.
    pub start: DateTime<Utc>,

    /// Watched time in seconds (the upstream bookmark).
    pub duration_secs: u64,

    /// Playback device class.
    pub device_type: i64,

    /// Playback country code.
    pub country: String,

    /// Series this episode belongs to. `None` for movies.
    pub series_id: Option<i64>,

    /// Full runtime of the title in seconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_secs: Option<u64>,

    /// Series display title, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_title: Option<String>,
}

impl ViewingRecord {
    /// Creates a movie record with the given start and watched duration.
    pub fn new(movie_id: i64, title: impl Into<String>, start: DateTime<Utc>, duration_secs: u64) -> Self {
        Self {
            movie_id,
            title: title.into(),
            start,
            duration_secs,
            device_type: 0,
            country: String::new(),
            series_id: None,
            runtime_secs: None,
            series_title: None,
        }
    }

    /// Marks this record as an episode of `series_id`.
    pub fn with_series(mut self, series_id: i64) -> Self {
        self.series_id = Some(series_id);
        self
    }

    /// Sets the playback device class.
    pub fn with_device(mut self, device_type: i64) -> Self {
        self.device_type = device_type;
        self
    }

    /// Returns true if this record is a movie rather than an episode.
    pub fn is_movie(&self) -> bool {
        self.series_id.is_none()
    }

    /// Returns the instant playback would have stopped, or `None` if it
    /// lies beyond the representable range.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        crate::store::splitter::checked_end(&self.start, self.duration_secs)
    }
}

/// The calendar day with the most accumulated watch time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongestDay {
    /// Date key in `YYYY-M-D` form, `None` if nothing was watched.
    pub date: Option<String>,

    /// Seconds watched on that day.
    pub time: u64,
}

/// Count and watch time for one series (or for all movies).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Number of records in the group.
    pub count: u32,

    /// Total watched seconds in the group.
    pub total_time: u64,
}

impl SeriesStats {
    /// Adds a record's watch time to this group.
    pub fn add_record(&mut self, record: &ViewingRecord) {
        self.count += 1;
        self.total_time = self.total_time.saturating_add(record.duration_secs);
    }
}

/// Summary of a viewing history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchStatistics {
    /// Number of records, including zero-duration ones.
    pub total_count: u32,

    /// Sum of all watched seconds.
    pub total_watch_time: u64,

    /// Number of distinct series watched.
    pub series_count: u32,

    /// Number of episode records.
    pub series_episode_count: u32,

    /// Watched seconds across all episodes.
    pub series_watch_time: u64,

    /// Number of movie records.
    pub movie_count: u32,

    /// Watched seconds across all movies.
    pub movie_watch_time: u64,

    /// Date key of the longest day, if any.
    pub longest_day: Option<String>,

    /// Seconds watched on the longest day.
    pub longest_day_watch_time: u64,

    /// Number of distinct device types.
    pub device_count: u32,
}
