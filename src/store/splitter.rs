//! Bucket splitting for viewing sessions.
//!
//! Distributes a session's watched duration across the periods it
//! touches. Every split preserves the total: the pieces always sum to
//! the session duration.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeDelta, TimeZone, Timelike};

/// Fixed chunk capacity for the hour-of-day split.
pub const SECONDS_PER_HOUR: u64 = 3600;

/// Formats the `YYYY-M-D` key of the calendar day containing `dt`.
///
/// Month and day are not zero padded.
pub fn day_key<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    date_key(dt.date_naive())
}

/// Formats the `YYYY-M-D` key of a calendar date.
pub fn date_key(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Returns `start + duration_secs`, or `None` if it cannot be represented.
pub fn checked_end<Tz: TimeZone>(start: &DateTime<Tz>, duration_secs: u64) -> Option<DateTime<Tz>> {
    i64::try_from(duration_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| start.clone().checked_add_signed(delta))
}

/// Formats the `YYYY-MM` key of the calendar month containing `dt`.
pub fn month_key<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!("{:04}-{:02}", dt.year(), dt.month())
}

/// Returns the first instant of the calendar day following `dt`.
///
/// When local midnight does not exist (a DST gap), the first valid
/// instant after it is used instead.
pub fn next_local_midnight<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = dt.timezone();
    dt.date_naive()
        .succ_opt()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| {
            tz.from_local_datetime(&midnight).earliest().or_else(|| {
                tz.from_local_datetime(&(midnight + Duration::hours(1)))
                    .earliest()
            })
        })
        .or_else(|| dt.clone().checked_add_signed(Duration::days(1)))
        .unwrap_or_else(|| dt.clone())
}

/// Whole seconds from `dt` until the next local midnight.
fn seconds_till_midnight<Tz: TimeZone>(dt: &DateTime<Tz>) -> u64 {
    (next_local_midnight(dt) - dt.clone()).num_seconds().max(0) as u64
}

/// Result of splitting a session at the first local midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSplit {
    /// Key and seconds for the day the session started.
    pub start: (String, u64),

    /// Key and seconds for the day the session ended, if different.
    pub end: Option<(String, u64)>,
}

impl CalendarSplit {
    /// Iterates over the `(day_key, seconds)` pieces in order.
    pub fn pieces(&self) -> impl Iterator<Item = (&str, u64)> {
        std::iter::once((self.start.0.as_str(), self.start.1))
            .chain(self.end.iter().map(|(key, secs)| (key.as_str(), *secs)))
    }
}

/// Splits a session across at most two calendar days.
///
/// Sessions that end on their start day are attributed whole. Otherwise
/// the start day receives the seconds up to midnight and the end day
/// receives the rest, however many days actually lie between them.
/// An end beyond the last representable instant is keyed on the last
/// representable date.
pub fn split_at_midnight<Tz: TimeZone>(start: &DateTime<Tz>, duration_secs: u64) -> CalendarSplit {
    let start_key = day_key(start);
    let end_key = match checked_end(start, duration_secs) {
        Some(end) => day_key(&end),
        None => date_key(NaiveDate::MAX),
    };

    if start_key == end_key {
        return CalendarSplit {
            start: (start_key, duration_secs),
            end: None,
        };
    }

    let before_midnight = seconds_till_midnight(start).min(duration_secs);
    CalendarSplit {
        start: (start_key, before_midnight),
        end: Some((end_key, duration_secs - before_midnight)),
    }
}

/// Iterator over `(bucket, seconds)` chunks of a wrap-around split.
///
/// Each chunk is `min(capacity, remaining)`; buckets advance by one and
/// wrap at `period`.
#[derive(Debug, Clone)]
pub struct PeriodicSplit {
    bucket: usize,
    period: usize,
    capacity: u64,
    remaining: u64,
}

impl PeriodicSplit {
    /// Creates a split starting at `bucket`. Capacity is at least one second.
    pub fn new(bucket: usize, period: usize, capacity: u64, duration_secs: u64) -> Self {
        Self {
            bucket: bucket % period,
            period,
            capacity: capacity.max(1),
            remaining: duration_secs,
        }
    }

    /// Adds every remaining chunk into `buckets` without walking them one
    /// by one. `buckets` must hold `period` entries.
    ///
    /// Gives the same totals as summing the iterator, in `O(period)`.
    pub fn fold_into(self, buckets: &mut [u64]) {
        let full_chunks = self.remaining / self.capacity;
        let rest = self.remaining % self.capacity;
        let cycles = full_chunks / self.period as u64;
        let extra = (full_chunks % self.period as u64) as usize;

        for offset in 0..self.period {
            let chunks = cycles + u64::from(offset < extra);
            let slot = &mut buckets[(self.bucket + offset) % self.period];
            *slot = slot.saturating_add(chunks * self.capacity);
        }

        if rest > 0 {
            let slot = &mut buckets[(self.bucket + extra) % self.period];
            *slot = slot.saturating_add(rest);
        }
    }
}

impl Iterator for PeriodicSplit {
    type Item = (usize, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let chunk = self.capacity.min(self.remaining);
        let bucket = self.bucket;
        self.remaining -= chunk;
        self.bucket = (self.bucket + 1) % self.period;
        Some((bucket, chunk))
    }
}

/// Splits a session across days of the week (0 = Sunday).
///
/// Chunk capacity is the seconds from `start` to the next local midnight,
/// computed once and reused for every following chunk.
pub fn split_by_weekday<Tz: TimeZone>(start: &DateTime<Tz>, duration_secs: u64) -> PeriodicSplit {
    let weekday = start.weekday().num_days_from_sunday() as usize;
    PeriodicSplit::new(weekday, 7, seconds_till_midnight(start), duration_secs)
}

/// Splits a session across hours of the day.
///
/// Every chunk holds up to a full hour, including the first one: the
/// offset of `start` within its hour is ignored.
pub fn split_by_hour<Tz: TimeZone>(start: &DateTime<Tz>, duration_secs: u64) -> PeriodicSplit {
    PeriodicSplit::new(start.hour() as usize, 24, SECONDS_PER_HOUR, duration_secs)
}
