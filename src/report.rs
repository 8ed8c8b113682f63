//! Report rendering for viewing statistics.
//!
//! Turns the aggregate results into display values: hour/minute strings,
//! fractional hours for chart series, hourly percentages, and a plain
//! text or JSON summary.

use crate::store::{HourlyWatchTime, SeriesBreakdown, WatchStatistics, WeeklyWatchTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Short day-of-week labels, index 0 = Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// All aggregates computed for one viewing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchReport {
    pub statistics: WatchStatistics,
    pub monthly: Vec<(String, u64)>,
    pub weekly: WeeklyWatchTime,
    pub hourly: HourlyWatchTime,
    pub series: SeriesBreakdown,
}

/// Formats seconds as `"H hours M minutes"`, truncating leftover seconds.
pub fn format_hours_minutes(secs: u64) -> String {
    format!("{} hours {} minutes", secs / 3600, (secs / 60) % 60)
}

/// Converts seconds to fractional hours.
pub fn hours(secs: u64) -> f64 {
    secs as f64 / 3600.0
}

/// Label for an hour-of-day bucket, e.g. `"7:00"`.
pub fn hour_label(hour: usize) -> String {
    format!("{}:00", hour)
}

/// Share of the total per hour, in percent.
///
/// Returns all zeros when nothing was watched.
pub fn hourly_percentages(hourly: &HourlyWatchTime) -> [f64; 24] {
    let total: u128 = hourly.iter().map(|&secs| u128::from(secs)).sum();
    let mut percentages = [0.0; 24];
    if total == 0 {
        return percentages;
    }

    for (slot, &secs) in percentages.iter_mut().zip(hourly.iter()) {
        *slot = secs as f64 / total as f64 * 100.0;
    }
    percentages
}

const RULE: &str = "════════════════════════════════════════════════════════════════";

impl fmt::Display for WatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.statistics;

        writeln!(f, "{}", RULE)?;
        writeln!(f, "📊 Viewing Summary")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "   Total Time:    {}", format_hours_minutes(stats.total_watch_time))?;
        writeln!(
            f,
            "   TV Shows:      {} series, {} episodes, {}",
            stats.series_count,
            stats.series_episode_count,
            format_hours_minutes(stats.series_watch_time)
        )?;
        writeln!(
            f,
            "   Movies:        {} movies, {}",
            stats.movie_count,
            format_hours_minutes(stats.movie_watch_time)
        )?;
        match &stats.longest_day {
            Some(date) => writeln!(
                f,
                "   Longest Day:   {} at {}",
                format_hours_minutes(stats.longest_day_watch_time),
                date
            )?,
            None => writeln!(f, "   Longest Day:   -")?,
        }
        writeln!(f, "   Devices Used:  {}", stats.device_count)?;

        if !self.monthly.is_empty() {
            writeln!(f)?;
            writeln!(f, "Monthly (hours):")?;
            for (month, secs) in &self.monthly {
                writeln!(f, "   {}  {:>8.2}", month, hours(*secs))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Weekly (hours):")?;
        for (label, secs) in WEEKDAY_LABELS.iter().zip(self.weekly.iter()) {
            writeln!(f, "   {}  {:>8.2}", label, hours(*secs))?;
        }

        writeln!(f)?;
        if self.hourly.iter().all(|&secs| secs == 0) {
            writeln!(f, "Hourly: no data")?;
        } else {
            writeln!(f, "Hourly (% of total):")?;
            for (hour, pct) in hourly_percentages(&self.hourly).iter().enumerate() {
                writeln!(f, "   {:>5}  {:>6.2}%", hour_label(hour), pct)?;
            }
        }
        writeln!(f, "{}", RULE)
    }
}

impl WatchReport {
    /// Renders the report as a human readable summary.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
