//! Time dimension from play-event timestamps

use super::types::TimeRow;
use crate::reader::ActivityRecord;
use chrono::{DateTime, Utc};

/// Convert an epoch-millisecond `ts` to a UTC timestamp
///
/// Millisecond precision is kept. Both the Time dimension and the Songplays
/// fact go through this function, so their `start_time` values always join.
pub fn start_time_from_ms(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ts)
}

/// Build the Time dimension: one row per distinct play timestamp
///
/// Non-play events are ignored. Returns the rows sorted by `start_time` and the
/// number of play events without a usable timestamp.
pub fn build_time(events: &[ActivityRecord]) -> (Vec<TimeRow>, usize) {
    let mut missing = 0;
    let mut starts: Vec<DateTime<Utc>> = events
        .iter()
        .filter(|event| event.is_song_play())
        .filter_map(|event| {
            let start = event.ts.and_then(start_time_from_ms);
            if start.is_none() {
                missing += 1;
            }
            start
        })
        .collect();

    starts.sort_unstable();
    starts.dedup();

    let rows = starts.into_iter().map(TimeRow::from_start_time).collect();
    (rows, missing)
}
