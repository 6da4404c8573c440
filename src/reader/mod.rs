//! Record reader module
//!
//! Loads the two raw JSON sources into typed, in-memory records.
//!
//! # Overview
//!
//! - `RecordSource` - lists and fetches the files of one source
//! - `SongRecord` / `ActivityRecord` - explicit raw record schemas
//! - lenient JSONL decoding that skips malformed lines and files
//!
//! No business logic happens here.

mod parser;
mod source;
mod types;

pub use parser::{decode_body, get_f64, get_i64, get_string, integral, DecodedBody};
pub use source::{ReadStats, RecordSource, SourceBatch};
pub use types::{ActivityRecord, RawRecord, SongRecord, NEXT_SONG_PAGE};
