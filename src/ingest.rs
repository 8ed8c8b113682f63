//! Ingestion of raw viewing-activity documents.
//!
//! Normalizes items of a viewing-activity feed (the `viewedItems` list
//! exported by the streaming service) into [`ViewingRecord`]s.

use crate::store::ViewingRecord;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upstream marker for "not part of a series". A series of `0` is read
/// the same way.
pub const MOVIE_SENTINEL: i64 = -1;

/// Errors raised while reading an activity document.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The activity file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or an item has the wrong shape.
    #[error("malformed activity document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is an object without a `viewedItems` list.
    #[error("activity document has no viewedItems list")]
    MissingViewedItems,

    /// An item's start timestamp cannot be represented.
    #[error("item {movie_id} has out-of-range timestamp {date}")]
    InvalidTimestamp { movie_id: i64, date: i64 },

    /// An item's watched time runs past the representable range.
    #[error("item {movie_id} has out-of-range bookmark {bookmark}")]
    InvalidDuration { movie_id: i64, bookmark: i64 },
}

/// One item as delivered by the activity feed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawViewedItem {
    #[serde(rename = "movieID")]
    movie_id: i64,
    title: Option<String>,
    /// Epoch milliseconds.
    date: i64,
    /// Watched seconds.
    #[serde(default)]
    bookmark: i64,
    /// Runtime of the title in seconds.
    duration: Option<i64>,
    country: Option<String>,
    #[serde(default)]
    device_type: i64,
    series: Option<i64>,
    series_title: Option<String>,
}

impl RawViewedItem {
    fn normalize(self) -> Result<ViewingRecord, IngestError> {
        let start = DateTime::from_timestamp_millis(self.date).ok_or(IngestError::InvalidTimestamp {
            movie_id: self.movie_id,
            date: self.date,
        })?;

        if self.bookmark < 0 {
            tracing::warn!(
                movie_id = self.movie_id,
                bookmark = self.bookmark,
                "Negative bookmark, treating as zero"
            );
        }

        let series_id = self
            .series
            .filter(|&id| id != MOVIE_SENTINEL && id != 0);

        let record = ViewingRecord {
            movie_id: self.movie_id,
            title: self.title.unwrap_or_default(),
            start,
            duration_secs: self.bookmark.max(0) as u64,
            device_type: self.device_type,
            country: self.country.unwrap_or_default(),
            series_id,
            runtime_secs: self.duration.and_then(|d| u64::try_from(d).ok()),
            series_title: series_id.and(self.series_title),
        };

        if record.end().is_none() {
            return Err(IngestError::InvalidDuration {
                movie_id: self.movie_id,
                bookmark: self.bookmark,
            });
        }

        Ok(record)
    }
}

/// Parses an activity document from a JSON string.
///
/// Accepts either `{ "viewedItems": [...] }` or a bare array of items.
pub fn parse_activity(json: &str) -> Result<Vec<ViewingRecord>, IngestError> {
    normalize_document(serde_json::from_str(json)?)
}

/// Parses an activity document from a reader.
pub fn read_activity<R: Read>(reader: R) -> Result<Vec<ViewingRecord>, IngestError> {
    normalize_document(serde_json::from_reader(reader)?)
}

/// Reads and parses an activity document from disk.
pub fn load_activity_file(path: &Path) -> Result<Vec<ViewingRecord>, IngestError> {
    tracing::info!(path = ?path, "Loading viewing activity");

    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_activity(std::io::BufReader::new(file))
}

fn normalize_document(document: Value) -> Result<Vec<ViewingRecord>, IngestError> {
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("viewedItems") {
            Some(Value::Array(items)) => items,
            _ => return Err(IngestError::MissingViewedItems),
        },
        _ => return Err(IngestError::MissingViewedItems),
    };

    let records = items
        .into_iter()
        .map(|item| serde_json::from_value::<RawViewedItem>(item)?.normalize())
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(records = records.len(), "Normalized viewing activity");
    Ok(records)
}
