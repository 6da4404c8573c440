//! Songs and Artists dimensions from the song catalog

use super::dedup::keep_last;
use super::types::{ArtistRow, SongRow};
use crate::reader::SongRecord;

/// Project the catalog onto the Songs dimension
///
/// Records without a song_id are dropped; duplicates keep the last observed
/// record. Returns the rows (sorted by song_id) and the number dropped.
pub fn extract_songs(records: &[SongRecord]) -> (Vec<SongRow>, usize) {
    let mut dropped = 0;
    let keyed: Vec<_> = records
        .iter()
        .filter_map(|record| {
            let Some(song_id) = non_empty(record.song_id.as_deref()) else {
                dropped += 1;
                return None;
            };
            let row = SongRow {
                song_id: song_id.to_string(),
                title: record.title.clone(),
                artist_id: record.artist_id.clone(),
                year: record.year,
                duration: record.duration,
            };
            Some((song_id.to_string(), record.ordinal, row))
        })
        .collect();

    (keep_last(keyed), dropped)
}

/// Project the catalog onto the Artists dimension
///
/// Records without an artist_id are dropped; duplicates keep the last observed
/// record. Returns the rows (sorted by artist_id) and the number dropped.
pub fn extract_artists(records: &[SongRecord]) -> (Vec<ArtistRow>, usize) {
    let mut dropped = 0;
    let keyed: Vec<_> = records
        .iter()
        .filter_map(|record| {
            let Some(artist_id) = non_empty(record.artist_id.as_deref()) else {
                dropped += 1;
                return None;
            };
            let row = ArtistRow {
                artist_id: artist_id.to_string(),
                name: record.artist_name.clone(),
                location: record.artist_location.clone(),
                latitude: record.artist_latitude,
                longitude: record.artist_longitude,
            };
            Some((artist_id.to_string(), record.ordinal, row))
        })
        .collect();

    (keep_last(keyed), dropped)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
