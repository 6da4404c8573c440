//! Star schema row types
//!
//! One struct per relation. Values are owned and immutable once built; the
//! output module turns each `Vec` of rows into an Arrow `RecordBatch`.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

/// Row of the Songs dimension
#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    /// `0` means unknown and is kept as is
    pub year: Option<i32>,
    pub duration: Option<f64>,
}

/// Row of the Artists dimension
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Row of the Users dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Row of the Time dimension
///
/// Every field is a pure function of `start_time`; build it with
/// [`TimeRow::from_start_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeRow {
    pub start_time: DateTime<Utc>,
    pub hour: i32,
    pub day: i32,
    /// ISO 8601 week number
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// Monday = 0 ... Sunday = 6
    pub weekday: i32,
}

impl TimeRow {
    /// Derive the calendar attributes of a timestamp
    pub fn from_start_time(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            hour: start_time.hour() as i32,
            day: start_time.day() as i32,
            week: start_time.iso_week().week() as i32,
            month: start_time.month() as i32,
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday() as i32,
        }
    }
}

/// Row of the Songplays fact
#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
    /// Surrogate key, unique within a run
    pub songplay_id: i64,
    pub start_time: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub level: Option<String>,
    /// `None` when the play did not match the song catalog
    pub song_id: Option<String>,
    /// `None` when the play did not match the song catalog
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl SongplayRow {
    /// Partition year, derived from `start_time`
    pub fn year(&self) -> i32 {
        self.start_time.year()
    }

    /// Partition month, derived from `start_time`
    pub fn month(&self) -> i32 {
        self.start_time.month() as i32
    }
}

/// The five relations produced by one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarSchema {
    pub songs: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
    pub users: Vec<UserRow>,
    pub time: Vec<TimeRow>,
    pub songplays: Vec<SongplayRow>,
}

/// Counters of records absorbed during transformation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    /// Song records without a song_id
    pub songs_without_key: usize,
    /// Song records without an artist_id
    pub artists_without_key: usize,
    /// Activity records with an empty or non-integer userId
    pub users_without_key: usize,
    /// Activity records with page == NextSong
    pub play_events: usize,
    /// Play events without a usable timestamp
    pub plays_without_ts: usize,
    /// Play events resolved against the song catalog
    pub plays_matched: usize,
}
