//! Users dimension from the activity log

use super::dedup::keep_last;
use super::types::UserRow;
use crate::error::{Error, Result};
use crate::reader::{integral, ActivityRecord};
use crate::types::SourceKind;

/// Build the Users dimension
///
/// Every event with an integer userId takes part, whatever its page, so tier
/// changes logged outside of plays are seen. Each user keeps the values of its
/// latest event by `ts`; on equal `ts` the later record in read order wins.
/// Events without `ts` rank below every timestamped event.
///
/// Fails with [`Error::EmptyInput`] when there are no activity records at all.
pub fn build_users(events: &[ActivityRecord]) -> Result<(Vec<UserRow>, usize)> {
    if events.is_empty() {
        return Err(Error::empty_input(SourceKind::LogData.name()));
    }

    let mut dropped = 0;
    let keyed: Vec<_> = events
        .iter()
        .filter_map(|event| {
            let Some(user_id) = parse_user_id(event.user_id.as_deref()) else {
                dropped += 1;
                return None;
            };
            let row = UserRow {
                user_id,
                first_name: event.first_name.clone(),
                last_name: event.last_name.clone(),
                gender: event.gender.clone(),
                level: event.level.clone(),
            };
            Some((user_id, (event.ts, event.ordinal), row))
        })
        .collect();

    Ok((keep_last(keyed), dropped))
}

/// Parse the string-encoded userId
///
/// Integral floats such as `5.0` are accepted; empty or fractional ids are `None`.
pub fn parse_user_id(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(integral))
}
