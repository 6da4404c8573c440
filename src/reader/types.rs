//! Raw record types
//!
//! Each raw record has an explicit, fixed field list. Fields are pulled out of
//! the decoded JSON object by name with a declared type, so a file with an odd
//! shape can never shift values into the wrong column. An absent field, or one
//! whose value has an incompatible type, becomes `None`.

use super::parser::{get_f64, get_i64, get_string};
use crate::types::{JsonObject, SourceKind};

/// Page value that marks a song play in the activity log
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// A decoded raw record of one source
pub trait RawRecord: Sized + Send + Sync + 'static {
    /// Which source this record shape belongs to
    const SOURCE: SourceKind;

    /// Build the record from a JSON object; `ordinal` is its position in read order
    fn from_object(obj: &JsonObject, ordinal: u64) -> Self;

    /// Position of the record in the deterministic read order
    fn ordinal(&self) -> u64;
}

// ============================================================================
// Song catalog
// ============================================================================

/// One record of the song catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongRecord {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    /// Release year, `0` when unknown
    pub year: Option<i32>,
    /// Duration in seconds
    pub duration: Option<f64>,
    pub num_songs: Option<i64>,
    /// Read-order position, used as the last-observed tie-break
    pub ordinal: u64,
}

impl RawRecord for SongRecord {
    const SOURCE: SourceKind = SourceKind::SongData;

    fn from_object(obj: &JsonObject, ordinal: u64) -> Self {
        Self {
            song_id: get_string(obj, "song_id"),
            title: get_string(obj, "title"),
            artist_id: get_string(obj, "artist_id"),
            artist_name: get_string(obj, "artist_name"),
            artist_location: get_string(obj, "artist_location"),
            artist_latitude: get_f64(obj, "artist_latitude"),
            artist_longitude: get_f64(obj, "artist_longitude"),
            year: get_i64(obj, "year").and_then(|y| i32::try_from(y).ok()),
            duration: get_f64(obj, "duration"),
            num_songs: get_i64(obj, "num_songs"),
            ordinal,
        }
    }

    fn ordinal(&self) -> u64 {
        self.ordinal
    }
}

// ============================================================================
// Activity log
// ============================================================================

/// One record of the user activity log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityRecord {
    /// String-encoded integer, may be empty for logged-out sessions
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    /// Subscription tier, `free` or `paid`
    pub level: Option<String>,
    /// Action type; only `NextSong` is a play
    pub page: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    /// Song length in seconds
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub item_in_session: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub auth: Option<String>,
    pub method: Option<String>,
    pub status: Option<i64>,
    /// Event time, epoch milliseconds
    pub ts: Option<i64>,
    pub registration: Option<f64>,
    /// Read-order position, used as the last-observed tie-break
    pub ordinal: u64,
}

impl ActivityRecord {
    /// Whether this event is a song play
    pub fn is_song_play(&self) -> bool {
        self.page.as_deref() == Some(NEXT_SONG_PAGE)
    }
}

impl RawRecord for ActivityRecord {
    const SOURCE: SourceKind = SourceKind::LogData;

    fn from_object(obj: &JsonObject, ordinal: u64) -> Self {
        Self {
            user_id: get_string(obj, "userId"),
            first_name: get_string(obj, "firstName"),
            last_name: get_string(obj, "lastName"),
            gender: get_string(obj, "gender"),
            level: get_string(obj, "level"),
            page: get_string(obj, "page"),
            song: get_string(obj, "song"),
            artist: get_string(obj, "artist"),
            length: get_f64(obj, "length"),
            session_id: get_i64(obj, "sessionId"),
            item_in_session: get_i64(obj, "itemInSession"),
            location: get_string(obj, "location"),
            user_agent: get_string(obj, "userAgent"),
            auth: get_string(obj, "auth"),
            method: get_string(obj, "method"),
            status: get_i64(obj, "status"),
            ts: get_i64(obj, "ts"),
            registration: get_f64(obj, "registration"),
            ordinal,
        }
    }

    fn ordinal(&self) -> u64 {
        self.ordinal
    }
}
