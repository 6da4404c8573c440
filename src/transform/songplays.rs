//! Songplays fact from play events
//!
//! The activity log and the song catalog share no key. A play is resolved by an
//! exact equality join on `(title, artist name, duration)`: the catalog side is
//! Songs joined to Artists on artist_id, the event side is `(song, artist,
//! length)`. The catalog is a small sample of what users actually play, so most
//! plays stay unresolved; they are kept with null song_id and artist_id.

use super::time::start_time_from_ms;
use super::types::{ArtistRow, SongRow, SongplayRow};
use crate::reader::ActivityRecord;
use std::collections::HashMap;

/// Join key: title, artist name, duration bits
type SongKey = (String, String, u64);

/// Content index over the Songs + Artists dimensions
#[derive(Debug, Default)]
pub struct SongIndex {
    entries: HashMap<SongKey, (String, Option<String>)>,
}

impl SongIndex {
    /// Index every song that has a title, a duration and a named artist
    ///
    /// When several songs share a key the lowest song_id wins.
    pub fn new(songs: &[SongRow], artists: &[ArtistRow]) -> Self {
        let names: HashMap<&str, &str> = artists
            .iter()
            .filter_map(|a| a.name.as_deref().map(|name| (a.artist_id.as_str(), name)))
            .collect();

        let mut ordered: Vec<&SongRow> = songs.iter().collect();
        ordered.sort_by(|a, b| a.song_id.cmp(&b.song_id));

        let mut entries = HashMap::with_capacity(ordered.len());
        for song in ordered {
            let (Some(title), Some(duration), Some(artist_id)) =
                (song.title.as_deref(), song.duration, song.artist_id.as_deref())
            else {
                continue;
            };
            let Some(artist_name) = names.get(artist_id) else {
                continue;
            };
            let key = (
                title.to_string(),
                (*artist_name).to_string(),
                duration_bits(duration),
            );
            entries
                .entry(key)
                .or_insert_with(|| (song.song_id.clone(), song.artist_id.clone()));
        }

        Self { entries }
    }

    /// Number of indexed songs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no song could be indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a play's `(song, artist, length)` to `(song_id, artist_id)`
    pub fn resolve(
        &self,
        title: Option<&str>,
        artist: Option<&str>,
        length: Option<f64>,
    ) -> Option<(&str, Option<&str>)> {
        let key = (title?.to_string(), artist?.to_string(), duration_bits(length?));
        self.entries
            .get(&key)
            .map(|(song_id, artist_id)| (song_id.as_str(), artist_id.as_deref()))
    }
}

/// Bit pattern of a duration, with `-0.0` folded into `0.0`
fn duration_bits(duration: f64) -> u64 {
    if duration == 0.0 {
        0
    } else {
        duration.to_bits()
    }
}

/// Counters from building the fact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SongplayStats {
    pub play_events: usize,
    pub without_ts: usize,
    pub matched: usize,
}

/// Build the Songplays fact
///
/// One row per `NextSong` event with a usable timestamp. Rows are ordered by
/// `(start_time, session_id, read order)` and numbered from 1, so identical
/// input always yields identical songplay ids.
pub fn build_songplays(
    events: &[ActivityRecord],
    index: &SongIndex,
) -> (Vec<SongplayRow>, SongplayStats) {
    let mut stats = SongplayStats::default();

    let mut plays: Vec<(i64, Option<i64>, u64, SongplayRow)> = Vec::new();
    for event in events.iter().filter(|e| e.is_song_play()) {
        stats.play_events += 1;

        let Some((ts, start_time)) = event
            .ts
            .and_then(|ts| start_time_from_ms(ts).map(|start| (ts, start)))
        else {
            stats.without_ts += 1;
            continue;
        };

        let resolved = index.resolve(
            event.song.as_deref(),
            event.artist.as_deref(),
            event.length,
        );
        if resolved.is_some() {
            stats.matched += 1;
        }
        let (song_id, artist_id) = match resolved {
            Some((song_id, artist_id)) => {
                (Some(song_id.to_string()), artist_id.map(str::to_string))
            }
            None => (None, None),
        };

        let row = SongplayRow {
            songplay_id: 0,
            start_time,
            user_id: super::users::parse_user_id(event.user_id.as_deref()),
            level: event.level.clone(),
            song_id,
            artist_id,
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
        };
        plays.push((ts, event.session_id, event.ordinal, row));
    }

    plays.sort_by(|a, b| (a.0, a.1, a.2).cmp(&(b.0, b.1, b.2)));

    let rows = plays
        .into_iter()
        .zip(1_i64..)
        .map(|((_, _, _, mut row), id)| {
            row.songplay_id = id;
            row
        })
        .collect();

    (rows, stats)
}
