//! Transformation module
//!
//! Turns raw records into the star schema.
//!
//! # Overview
//!
//! - `extract_songs` / `extract_artists` - catalog dimensions
//! - `build_users` - user dimension with the latest subscription level
//! - `build_time` - calendar dimension of play timestamps
//! - `build_songplays` - fact table with best-effort catalog resolution
//!
//! Every dedup is an explicit sort over `(key, ordering)` followed by a
//! group-and-keep-last pass, never a mutable map update. The builders share no
//! state and only read their inputs, so `build_star_schema` runs the dimension
//! builders concurrently; `build_songplays` needs the finished Songs and Artists.

mod dedup;
mod songplays;
mod songs;
mod time;
mod types;
mod users;

pub use dedup::keep_last;
pub use songplays::{build_songplays, SongIndex, SongplayStats};
pub use songs::{extract_artists, extract_songs};
pub use time::{build_time, start_time_from_ms};
pub use types::{
    ArtistRow, SongRow, SongplayRow, StarSchema, TimeRow, TransformStats, UserRow,
};
pub use users::{build_users, parse_user_id};

use crate::error::{Error, Result};
use crate::reader::{ActivityRecord, SongRecord};
use std::sync::Arc;
use tracing::debug;

/// Build every relation
///
/// Songs/Artists, Users and Time run concurrently on the blocking pool over
/// shared read-only inputs; Songplays runs once Songs and Artists exist.
///
/// Fails with [`Error::EmptyInput`] when there are no activity records.
pub async fn build_star_schema(
    songs: Vec<SongRecord>,
    events: Vec<ActivityRecord>,
) -> Result<(StarSchema, TransformStats)> {
    let events = Arc::new(events);

    let catalog =
        tokio::task::spawn_blocking(move || (extract_songs(&songs), extract_artists(&songs)));
    let users = {
        let events = Arc::clone(&events);
        tokio::task::spawn_blocking(move || build_users(&events))
    };
    let time = {
        let events = Arc::clone(&events);
        tokio::task::spawn_blocking(move || build_time(&events))
    };

    let (catalog, users, time) = tokio::try_join!(catalog, users, time)
        .map_err(|e| Error::transform("dimensions", e.to_string()))?;
    let ((song_rows, songs_without_key), (artist_rows, artists_without_key)) = catalog;
    let (user_rows, users_without_key) = users?;
    let (time_rows, _) = time;
    debug!("Dimensions built");

    let (songplay_rows, play_stats, song_rows, artist_rows) = tokio::task::spawn_blocking(move || {
        let index = SongIndex::new(&song_rows, &artist_rows);
        debug!("Indexed {} songs for the songplay join", index.len());
        let (rows, stats) = build_songplays(&events, &index);
        (rows, stats, song_rows, artist_rows)
    })
    .await
    .map_err(|e| Error::transform("songplays", e.to_string()))?;

    let stats = TransformStats {
        songs_without_key,
        artists_without_key,
        users_without_key,
        play_events: play_stats.play_events,
        plays_without_ts: play_stats.without_ts,
        plays_matched: play_stats.matched,
    };

    let schema = StarSchema {
        songs: song_rows,
        artists: artist_rows,
        users: user_rows,
        time: time_rows,
        songplays: songplay_rows,
    };

    Ok((schema, stats))
}
