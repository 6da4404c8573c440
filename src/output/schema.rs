//! Arrow schemas of the star schema and row-to-batch conversion
//!
//! Schemas are declared, never inferred, so every run writes the same column
//! names and types whatever the input looked like.

use crate::error::Result;
use crate::transform::{ArtistRow, SongRow, SongplayRow, StarSchema, TimeRow, UserRow};
use crate::types::Relation;
use arrow::array::{
    ArrayRef, Float64Array, Int32Array, Int64Array, StringArray, TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// A relation ready to be written
#[derive(Debug, Clone)]
pub struct RelationBatch {
    /// Which relation the rows belong to
    pub relation: Relation,
    /// All rows of the relation
    pub batch: RecordBatch,
}

impl RelationBatch {
    /// Pair a relation with its rows
    pub fn new(relation: Relation, batch: RecordBatch) -> Self {
        Self { relation, batch }
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }
}

// ============================================================================
// Schema Definitions
// ============================================================================

fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into()))
}

fn songs_schema() -> Schema {
    Schema::new(vec![
        Field::new("song_id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("year", DataType::Int32, true),
        Field::new("duration", DataType::Float64, true),
    ])
}

fn artists_schema() -> Schema {
    Schema::new(vec![
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
    ])
}

fn users_schema() -> Schema {
    Schema::new(vec![
        Field::new("user_id", DataType::Int64, false),
        Field::new("first_name", DataType::Utf8, true),
        Field::new("last_name", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
    ])
}

fn time_schema() -> Schema {
    Schema::new(vec![
        Field::new("start_time", timestamp_type(), false),
        Field::new("hour", DataType::Int32, false),
        Field::new("day", DataType::Int32, false),
        Field::new("week", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("year", DataType::Int32, false),
        Field::new("weekday", DataType::Int32, false),
    ])
}

fn songplays_schema() -> Schema {
    Schema::new(vec![
        Field::new("songplay_id", DataType::Int64, false),
        Field::new("start_time", timestamp_type(), false),
        Field::new("user_id", DataType::Int64, true),
        Field::new("level", DataType::Utf8, true),
        Field::new("song_id", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("session_id", DataType::Int64, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("user_agent", DataType::Utf8, true),
        Field::new("year", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
    ])
}

/// Declared Arrow schema of a relation, partition columns included
pub fn relation_schema(relation: Relation) -> SchemaRef {
    Arc::new(match relation {
        Relation::Songplays => songplays_schema(),
        Relation::Users => users_schema(),
        Relation::Songs => songs_schema(),
        Relation::Artists => artists_schema(),
        Relation::Time => time_schema(),
    })
}

// ============================================================================
// Row Conversion
// ============================================================================

fn strings<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    Arc::new(values.collect::<StringArray>())
}

/// Songs rows as a batch
pub fn songs_batch(rows: &[SongRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        strings(rows.iter().map(|r| Some(r.song_id.as_str()))),
        strings(rows.iter().map(|r| r.title.as_deref())),
        strings(rows.iter().map(|r| r.artist_id.as_deref())),
        Arc::new(rows.iter().map(|r| r.year).collect::<Int32Array>()),
        Arc::new(rows.iter().map(|r| r.duration).collect::<Float64Array>()),
    ];
    Ok(RecordBatch::try_new(relation_schema(Relation::Songs), columns)?)
}

/// Artists rows as a batch
pub fn artists_batch(rows: &[ArtistRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        strings(rows.iter().map(|r| Some(r.artist_id.as_str()))),
        strings(rows.iter().map(|r| r.name.as_deref())),
        strings(rows.iter().map(|r| r.location.as_deref())),
        Arc::new(rows.iter().map(|r| r.latitude).collect::<Float64Array>()),
        Arc::new(rows.iter().map(|r| r.longitude).collect::<Float64Array>()),
    ];
    Ok(RecordBatch::try_new(relation_schema(Relation::Artists), columns)?)
}

/// Users rows as a batch
pub fn users_batch(rows: &[UserRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(rows.iter().map(|r| Some(r.user_id)).collect::<Int64Array>()),
        strings(rows.iter().map(|r| r.first_name.as_deref())),
        strings(rows.iter().map(|r| r.last_name.as_deref())),
        strings(rows.iter().map(|r| r.gender.as_deref())),
        strings(rows.iter().map(|r| r.level.as_deref())),
    ];
    Ok(RecordBatch::try_new(relation_schema(Relation::Users), columns)?)
}

/// Time rows as a batch
pub fn time_batch(rows: &[TimeRow]) -> Result<RecordBatch> {
    let int = |f: fn(&TimeRow) -> i32| -> ArrayRef {
        Arc::new(rows.iter().map(|r| Some(f(r))).collect::<Int32Array>())
    };
    let start_times = rows
        .iter()
        .map(|r| Some(r.start_time.timestamp_millis()))
        .collect::<TimestampMillisecondArray>()
        .with_timezone("UTC");

    let columns: Vec<ArrayRef> = vec![
        Arc::new(start_times),
        int(|r| r.hour),
        int(|r| r.day),
        int(|r| r.week),
        int(|r| r.month),
        int(|r| r.year),
        int(|r| r.weekday),
    ];
    Ok(RecordBatch::try_new(relation_schema(Relation::Time), columns)?)
}

/// Songplays rows as a batch, with derived year/month partition columns
pub fn songplays_batch(rows: &[SongplayRow]) -> Result<RecordBatch> {
    let start_times = rows
        .iter()
        .map(|r| Some(r.start_time.timestamp_millis()))
        .collect::<TimestampMillisecondArray>()
        .with_timezone("UTC");

    let columns: Vec<ArrayRef> = vec![
        Arc::new(rows.iter().map(|r| Some(r.songplay_id)).collect::<Int64Array>()),
        Arc::new(start_times),
        Arc::new(rows.iter().map(|r| r.user_id).collect::<Int64Array>()),
        strings(rows.iter().map(|r| r.level.as_deref())),
        strings(rows.iter().map(|r| r.song_id.as_deref())),
        strings(rows.iter().map(|r| r.artist_id.as_deref())),
        Arc::new(rows.iter().map(|r| r.session_id).collect::<Int64Array>()),
        strings(rows.iter().map(|r| r.location.as_deref())),
        strings(rows.iter().map(|r| r.user_agent.as_deref())),
        Arc::new(rows.iter().map(|r| Some(r.year())).collect::<Int32Array>()),
        Arc::new(rows.iter().map(|r| Some(r.month())).collect::<Int32Array>()),
    ];
    Ok(RecordBatch::try_new(relation_schema(Relation::Songplays), columns)?)
}

/// Convert every relation of a star schema, in write order
pub fn star_schema_batches(schema: &StarSchema) -> Result<Vec<RelationBatch>> {
    Relation::ALL
        .iter()
        .map(|&relation| {
            let batch = match relation {
                Relation::Songs => songs_batch(&schema.songs)?,
                Relation::Artists => artists_batch(&schema.artists)?,
                Relation::Users => users_batch(&schema.users)?,
                Relation::Time => time_batch(&schema.time)?,
                Relation::Songplays => songplays_batch(&schema.songplays)?,
            };
            Ok(RelationBatch::new(relation, batch))
        })
        .collect()
}
