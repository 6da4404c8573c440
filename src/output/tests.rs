//! Tests for output module

use super::*;
use crate::config::{CompressionCodec, OutputConfig};
use crate::error::Error;
use crate::storage::StorageLocation;
use crate::transform::{ArtistRow, SongRow, SongplayRow, StarSchema, TimeRow, UserRow};
use crate::types::Relation;
use arrow::array::{Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use futures::TryStreamExt;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use async_trait::async_trait;
use futures::stream::BoxStream;
use object_store::{
    GetOptions, GetResult, ListResult, MultipartUpload, ObjectMeta, ObjectStore,
    PutMultipartOpts, PutOptions, PutPayload, PutResult,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

fn at(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

// 2018-11-30T19:54:24.796Z
const NOV_2018: i64 = 1_543_607_664_796;
// 2018-02-01T00:00:00Z
const FEB_2018: i64 = 1_517_443_200_000;

fn songplay(id: i64, ms: i64) -> SongplayRow {
    SongplayRow {
        songplay_id: id,
        start_time: at(ms),
        user_id: Some(5),
        level: Some("paid".to_string()),
        song_id: None,
        artist_id: None,
        session_id: Some(42),
        location: Some("Tampa, FL".to_string()),
        user_agent: None,
    }
}

fn sample_schema() -> StarSchema {
    StarSchema {
        songs: vec![SongRow {
            song_id: "SOUPIRU12A6D4FA1E1".to_string(),
            title: Some("Der Kleine Dompfaff".to_string()),
            artist_id: Some("ARJIE2Y1187B994AB7".to_string()),
            year: None,
            duration: Some(152.92036),
        }],
        artists: vec![ArtistRow {
            artist_id: "ARJIE2Y1187B994AB7".to_string(),
            name: Some("Line Renaud".to_string()),
            location: None,
            latitude: None,
            longitude: None,
        }],
        users: vec![UserRow {
            user_id: 5,
            first_name: Some("Elijah".to_string()),
            last_name: Some("Davis".to_string()),
            gender: Some("M".to_string()),
            level: Some("paid".to_string()),
        }],
        time: vec![
            TimeRow::from_start_time(at(FEB_2018)),
            TimeRow::from_start_time(at(NOV_2018)),
        ],
        songplays: vec![
            songplay(1, FEB_2018),
            songplay(2, NOV_2018),
            songplay(3, NOV_2018 + 1),
        ],
    }
}

fn memory_location() -> (Arc<InMemory>, StorageLocation) {
    let store = Arc::new(InMemory::new());
    let location = StorageLocation::new(store.clone(), "lake", "memory");
    (store, location)
}

async fn list_paths(store: &InMemory, prefix: &str) -> Vec<String> {
    let prefix = ObjectPath::from(prefix);
    let mut paths: Vec<String> = store
        .list(Some(&prefix))
        .map_ok(|meta| meta.location.to_string())
        .try_collect()
        .await
        .unwrap();
    paths.sort();
    paths
}

async fn read_parquet(store: &InMemory, path: &str) -> Vec<RecordBatch> {
    let body = store
        .get(&ObjectPath::from(path))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    ParquetRecordBatchReaderBuilder::try_new(body)
        .unwrap()
        .build()
        .unwrap()
        .collect::<std::result::Result<Vec<_>, _>>()
        .unwrap()
}

async fn put_bytes(store: &dyn ObjectStore, path: &str, body: &'static [u8]) {
    store
        .put(&ObjectPath::from(path), PutPayload::from(Bytes::from_static(body)))
        .await
        .unwrap();
}

async fn list_store(store: &dyn ObjectStore, prefix: &str) -> Vec<String> {
    let prefix = ObjectPath::from(prefix);
    let mut paths: Vec<String> = store
        .list(Some(&prefix))
        .map_ok(|meta| meta.location.to_string())
        .try_collect()
        .await
        .unwrap();
    paths.sort();
    paths
}

async fn get_bytes(store: &dyn ObjectStore, path: &str) -> Bytes {
    store
        .get(&ObjectPath::from(path))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap()
}

/// In-memory store that refuses to copy new files below one prefix
///
/// Renames are copy then delete, so renames into the prefix fail too. Copies
/// out of a backup area are let through so previous output can be restored.
#[derive(Debug)]
struct CopyRefusingStore {
    inner: InMemory,
    refused: ObjectPath,
}

impl CopyRefusingStore {
    fn new(refused: &str) -> Self {
        Self {
            inner: InMemory::new(),
            refused: ObjectPath::from(refused),
        }
    }
}

impl std::fmt::Display for CopyRefusingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CopyRefusingStore({})", self.refused)
    }
}

#[async_trait]
impl ObjectStore for CopyRefusingStore {
    async fn put_opts(
        &self,
        location: &ObjectPath,
        payload: PutPayload,
        opts: PutOptions,
    ) -> object_store::Result<PutResult> {
        self.inner.put_opts(location, payload, opts).await
    }

    async fn put_multipart_opts(
        &self,
        location: &ObjectPath,
        opts: PutMultipartOpts,
    ) -> object_store::Result<Box<dyn MultipartUpload>> {
        self.inner.put_multipart_opts(location, opts).await
    }

    async fn get_opts(
        &self,
        location: &ObjectPath,
        options: GetOptions,
    ) -> object_store::Result<GetResult> {
        self.inner.get_opts(location, options).await
    }

    async fn delete(&self, location: &ObjectPath) -> object_store::Result<()> {
        self.inner.delete(location).await
    }

    fn list(&self, prefix: Option<&ObjectPath>) -> BoxStream<'_, object_store::Result<ObjectMeta>> {
        self.inner.list(prefix)
    }

    async fn list_with_delimiter(
        &self,
        prefix: Option<&ObjectPath>,
    ) -> object_store::Result<ListResult> {
        self.inner.list_with_delimiter(prefix).await
    }

    async fn copy(&self, from: &ObjectPath, to: &ObjectPath) -> object_store::Result<()> {
        let restoring = from.parts().any(|part| part.as_ref() == PREVIOUS_DIR);
        if to.prefix_matches(&self.refused) && !restoring {
            return Err(object_store::Error::Generic {
                store: "CopyRefusingStore",
                source: format!("copy into {} refused", self.refused).into(),
            });
        }
        self.inner.copy(from, to).await
    }

    async fn copy_if_not_exists(
        &self,
        from: &ObjectPath,
        to: &ObjectPath,
    ) -> object_store::Result<()> {
        self.inner.copy_if_not_exists(from, to).await
    }
}

fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

// ============================================================================
// Schema Tests
// ============================================================================

#[test]
fn test_relation_schema_columns() {
    let names = |relation| -> Vec<String> {
        relation_schema(relation)
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    };

    assert_eq!(
        names(Relation::Songs),
        vec!["song_id", "title", "artist_id", "year", "duration"]
    );
    assert_eq!(
        names(Relation::Artists),
        vec!["artist_id", "name", "location", "latitude", "longitude"]
    );
    assert_eq!(
        names(Relation::Users),
        vec!["user_id", "first_name", "last_name", "gender", "level"]
    );
    assert_eq!(
        names(Relation::Time),
        vec!["start_time", "hour", "day", "week", "month", "year", "weekday"]
    );
    assert_eq!(
        names(Relation::Songplays),
        vec![
            "songplay_id",
            "start_time",
            "user_id",
            "level",
            "song_id",
            "artist_id",
            "session_id",
            "location",
            "user_agent",
            "year",
            "month"
        ]
    );
}

#[test]
fn test_start_time_is_utc_millis() {
    let schema = relation_schema(Relation::Time);
    let field = schema.field_with_name("start_time").unwrap();
    assert_eq!(
        field.data_type(),
        &DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into()))
    );
}

#[test]
fn test_songs_batch_keeps_nulls() {
    let batch = songs_batch(&sample_schema().songs).unwrap();
    assert_eq!(batch.num_rows(), 1);

    let year = batch
        .column_by_name("year")
        .unwrap()
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert!(year.is_null(0));
}

#[test]
fn test_songplays_batch_derives_partition_columns() {
    let batch = songplays_batch(&sample_schema().songplays).unwrap();

    let year = batch
        .column_by_name("year")
        .unwrap()
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    let month = batch
        .column_by_name("month")
        .unwrap()
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();

    assert_eq!(year.values().to_vec(), vec![2018, 2018, 2018]);
    assert_eq!(month.values().to_vec(), vec![2, 11, 11]);
}

#[test]
fn test_star_schema_batches_write_order() {
    let batches = star_schema_batches(&sample_schema()).unwrap();
    let order: Vec<Relation> = batches.iter().map(|b| b.relation).collect();
    assert_eq!(order, Relation::ALL.to_vec());
    assert_eq!(batches[4].num_rows(), 3);
}

#[test]
fn test_empty_relations_convert() {
    let batches = star_schema_batches(&StarSchema::default()).unwrap();
    assert!(batches.iter().all(|b| b.num_rows() == 0));
}

// ============================================================================
// Partition Tests
// ============================================================================

#[test]
fn test_build_partition_dir() {
    let dir = build_partition_dir(&[("year", "2018".to_string()), ("month", "11".to_string())]);
    assert_eq!(dir, "year=2018/month=11");
}

#[test]
fn test_split_by_year_month() {
    let batch = songplays_batch(&sample_schema().songplays).unwrap();
    let partitions = split_by_partition(&batch, &["year", "month"]).unwrap();

    let dirs: Vec<&str> = partitions.iter().map(|p| p.dir.as_str()).collect();
    assert_eq!(dirs, vec!["year=2018/month=2", "year=2018/month=11"]);

    assert_eq!(partitions[0].batch.num_rows(), 1);
    assert_eq!(partitions[1].batch.num_rows(), 2);

    let names = column_names(&partitions[1].batch);
    assert!(!names.contains(&"year".to_string()));
    assert!(!names.contains(&"month".to_string()));
    assert_eq!(names.len(), 9);

    let ids = partitions[1]
        .batch
        .column_by_name("songplay_id")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(ids.values().to_vec(), vec![2, 3]);
}

#[test]
fn test_split_without_keys() {
    let batch = users_batch(&sample_schema().users).unwrap();
    let partitions = split_by_partition(&batch, &[]).unwrap();
    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0].dir, "");
    assert_eq!(partitions[0].batch.num_columns(), 5);
}

#[test]
fn test_split_null_key_uses_default_partition() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("region", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(StringArray::from(vec![Some("eu"), None])),
        ],
    )
    .unwrap();

    let partitions = split_by_partition(&batch, &["region"]).unwrap();
    let dirs: Vec<String> = partitions.iter().map(|p| p.dir.clone()).collect();
    let null_dir = format!("region={DEFAULT_PARTITION}");
    assert_eq!(dirs, vec![null_dir, "region=eu".to_string()]);
}

#[test]
fn test_split_missing_key_is_error() {
    let batch = users_batch(&sample_schema().users).unwrap();
    let result = split_by_partition(&batch, &["year"]);
    assert!(matches!(result, Err(Error::Output { .. })));
}

// ============================================================================
// Parquet Writer Config Tests
// ============================================================================

/// Column chunks of the first row group: (has dictionary page, has statistics)
fn chunk_features(body: Bytes) -> Vec<(bool, bool)> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(body).unwrap();
    reader
        .metadata()
        .row_group(0)
        .columns()
        .iter()
        .map(|c| (c.dictionary_page_offset().is_some(), c.statistics().is_some()))
        .collect()
}

#[test]
fn test_parquet_writer_config_default() {
    let config = ParquetWriterConfig::default();
    assert_eq!(config.compression(), parquet::basic::Compression::SNAPPY);

    let batch = users_batch(&sample_schema().users).unwrap();
    let features = chunk_features(encode_parquet(&batch, &config).unwrap());
    assert!(features.iter().any(|(dictionary, _)| *dictionary));
    assert!(features.iter().all(|(_, statistics)| *statistics));
}

#[test]
fn test_parquet_writer_config_builder() {
    let config = ParquetWriterConfig::new()
        .with_row_group_size(1000)
        .with_dictionary(false)
        .with_statistics(false)
        .uncompressed();

    assert_eq!(config.row_group_size(), 1000);
    assert_eq!(
        config.compression(),
        parquet::basic::Compression::UNCOMPRESSED
    );

    let batch = users_batch(&sample_schema().users).unwrap();
    let features = chunk_features(encode_parquet(&batch, &config).unwrap());
    assert!(features.iter().all(|f| *f == (false, false)));
}

#[test]
fn test_parquet_writer_config_from_output() {
    let output = OutputConfig {
        compression: CompressionCodec::Zstd,
        row_group_size: 500,
        ..OutputConfig::default()
    };
    let config = ParquetWriterConfig::from(&output);
    assert_eq!(config.row_group_size(), 500);
    assert!(matches!(
        config.compression(),
        parquet::basic::Compression::ZSTD(_)
    ));

    let output = OutputConfig {
        compression: CompressionCodec::None,
        ..OutputConfig::default()
    };
    assert_eq!(
        ParquetWriterConfig::from(&output).compression(),
        parquet::basic::Compression::UNCOMPRESSED
    );
}

#[test]
fn test_parquet_writer_config_from_output_flags() {
    let output = OutputConfig {
        dictionary: false,
        statistics: false,
        ..OutputConfig::default()
    };
    let config = ParquetWriterConfig::from(&output);

    let batch = users_batch(&sample_schema().users).unwrap();
    let features = chunk_features(encode_parquet(&batch, &config).unwrap());
    assert!(features.iter().all(|f| *f == (false, false)));
}

// ============================================================================
// Parquet Writer Tests
// ============================================================================

#[test]
fn test_parquet_writer_rows_written() {
    let batch = songplays_batch(&sample_schema().songplays).unwrap();
    let config = ParquetWriterConfig::default();
    let mut writer = ParquetWriter::new(Vec::new(), batch.schema().as_ref(), &config).unwrap();

    writer.write(&batch).unwrap();
    writer.write(&batch).unwrap();

    let (buf, rows) = writer.finish().unwrap();
    assert_eq!(rows, 6);
    assert!(!buf.is_empty());
}

#[test]
fn test_encode_parquet_reads_back() {
    let batch = time_batch(&sample_schema().time).unwrap();
    let body = encode_parquet(&batch, &ParquetWriterConfig::new().gzip()).unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(body).unwrap();
    assert_eq!(
        reader.schema().fields(),
        relation_schema(Relation::Time).fields()
    );

    let batches: Vec<RecordBatch> = reader.build().unwrap().map(|b| b.unwrap()).collect();
    let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    assert_eq!(rows, 2);
}

#[test]
fn test_encode_empty_batch_keeps_schema() {
    let batch = users_batch(&[]).unwrap();
    let body = encode_parquet(&batch, &ParquetWriterConfig::default()).unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(body).unwrap();
    assert_eq!(reader.schema().fields().len(), 5);
}

// ============================================================================
// Sink Tests
// ============================================================================

#[tokio::test]
async fn test_sink_publishes_layout() {
    let (store, location) = memory_location();
    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default()).with_run_id("run1");

    let batches = star_schema_batches(&sample_schema()).unwrap();
    let written = sink.write_relations(&batches).await.unwrap();
    assert_eq!(written.len(), 5);

    let paths = list_paths(&store, "lake").await;
    assert_eq!(
        paths,
        vec![
            "lake/artists/_SUCCESS",
            "lake/artists/part-00000.parquet",
            "lake/songplays/_SUCCESS",
            "lake/songplays/year=2018/month=11/part-00000.parquet",
            "lake/songplays/year=2018/month=2/part-00000.parquet",
            "lake/songs/_SUCCESS",
            "lake/songs/part-00000.parquet",
            "lake/time/_SUCCESS",
            "lake/time/year=2018/month=11/part-00000.parquet",
            "lake/time/year=2018/month=2/part-00000.parquet",
            "lake/users/_SUCCESS",
            "lake/users/part-00000.parquet",
        ]
    );

    let songplays = written
        .iter()
        .find(|w| w.relation == Relation::Songplays)
        .unwrap();
    assert_eq!(songplays.rows, 3);
    assert_eq!(songplays.files, 2);
    assert_eq!(songplays.partitions, 2);
    assert!(songplays.bytes > 0);
}

#[tokio::test]
async fn test_partition_columns_not_in_files() {
    let (store, location) = memory_location();
    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default());
    let batches = star_schema_batches(&sample_schema()).unwrap();
    sink.write_relations(&batches).await.unwrap();

    let path = "lake/songplays/year=2018/month=11/part-00000.parquet";
    let batches = read_parquet(&store, path).await;
    let names = column_names(&batches[0]);
    assert!(!names.contains(&"year".to_string()));
    assert!(!names.contains(&"month".to_string()));

    // Time keeps start_time and its other calendar fields
    let batches = read_parquet(&store, "lake/time/year=2018/month=2/part-00000.parquet").await;
    assert_eq!(
        column_names(&batches[0]),
        vec!["start_time", "hour", "day", "week", "weekday"]
    );
}

#[tokio::test]
async fn test_rerun_replaces_previous_output() {
    let (store, location) = memory_location();
    store
        .put(
            &ObjectPath::from("lake/songplays/year=1999/month=1/part-00000.parquet"),
            PutPayload::from(Bytes::from_static(b"stale")),
        )
        .await
        .unwrap();

    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default());
    let batches = star_schema_batches(&sample_schema()).unwrap();
    sink.write_relations(&batches).await.unwrap();

    let paths = list_paths(&store, "lake/songplays").await;
    assert!(paths.iter().all(|p| !p.contains("year=1999")));
    assert_eq!(paths.len(), 3);
}

#[tokio::test]
async fn test_staging_removed_after_publish() {
    let (store, location) = memory_location();
    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default()).with_run_id("abc");
    let batches = star_schema_batches(&sample_schema()).unwrap();
    sink.write_relations(&batches).await.unwrap();

    assert!(list_paths(&store, "lake/_staging").await.is_empty());
}

#[tokio::test]
async fn test_max_rows_per_file_splits_partitions() {
    let (store, location) = memory_location();
    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default())
        .with_max_rows_per_file(1);
    let batches = star_schema_batches(&sample_schema()).unwrap();
    sink.write_relations(&batches).await.unwrap();

    let paths = list_paths(&store, "lake/songplays/year=2018/month=11").await;
    assert_eq!(
        paths,
        vec![
            "lake/songplays/year=2018/month=11/part-00000.parquet",
            "lake/songplays/year=2018/month=11/part-00001.parquet",
        ]
    );
}

#[tokio::test]
async fn test_empty_unpartitioned_relation_still_written() {
    let (store, location) = memory_location();
    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default());
    let batches = star_schema_batches(&StarSchema::default()).unwrap();
    let written = sink.write_relations(&batches).await.unwrap();

    assert!(written.iter().all(|w| w.rows == 0));
    let users = list_paths(&store, "lake/users").await;
    assert_eq!(users, vec!["lake/users/_SUCCESS", "lake/users/part-00000.parquet"]);
    let songplays = list_paths(&store, "lake/songplays").await;
    assert_eq!(songplays, vec!["lake/songplays/_SUCCESS"]);
}

#[tokio::test]
async fn test_staging_failure_publishes_nothing() {
    let (store, location) = memory_location();
    let previous = ObjectPath::from("lake/songs/part-00000.parquet");
    store
        .put(&previous, PutPayload::from(Bytes::from_static(b"previous")))
        .await
        .unwrap();

    // A Time batch without its partition columns cannot be staged
    let mut batches = star_schema_batches(&sample_schema()).unwrap();
    let broken = users_batch(&sample_schema().users).unwrap();
    let position = batches
        .iter()
        .position(|b| b.relation == Relation::Time)
        .unwrap();
    batches[position] = RelationBatch::new(Relation::Time, broken);

    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default());
    let result = sink.write_relations(&batches).await;

    match result {
        Err(Error::WriteFailure { relation, .. }) => assert_eq!(relation, "time"),
        other => panic!("expected WriteFailure, got {other:?}"),
    }

    // Songs were staged before the failure but never published
    let body = store.get(&previous).await.unwrap().bytes().await.unwrap();
    assert_eq!(body.as_ref(), b"previous");
    assert!(list_paths(&store, "lake/_staging").await.is_empty());
    assert!(list_paths(&store, "lake/songplays").await.is_empty());
}

#[tokio::test]
async fn test_publish_failure_restores_previous_output() {
    let store = Arc::new(CopyRefusingStore::new("lake/songplays"));
    put_bytes(&*store, "lake/songs/part-00000.parquet", b"previous songs").await;
    put_bytes(&*store, "lake/songs/_SUCCESS", b"").await;
    put_bytes(
        &*store,
        "lake/songplays/year=2017/month=3/part-00000.parquet",
        b"previous songplays",
    )
    .await;
    put_bytes(&*store, "lake/songplays/_SUCCESS", b"").await;

    let location = StorageLocation::new(store.clone(), "lake", "memory");
    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default()).with_run_id("r2");
    let batches = star_schema_batches(&sample_schema()).unwrap();
    let result = sink.write_relations(&batches).await;

    // Songplays are placed last, after every other relation
    match result {
        Err(Error::WriteFailure { relation, .. }) => assert_eq!(relation, "songplays"),
        other => panic!("expected WriteFailure, got {other:?}"),
    }

    assert_eq!(
        list_store(&*store, "lake").await,
        vec![
            "lake/songplays/_SUCCESS",
            "lake/songplays/year=2017/month=3/part-00000.parquet",
            "lake/songs/_SUCCESS",
            "lake/songs/part-00000.parquet",
        ]
    );
    assert_eq!(
        get_bytes(&*store, "lake/songs/part-00000.parquet").await.as_ref(),
        b"previous songs"
    );
    assert_eq!(
        get_bytes(
            &*store,
            "lake/songplays/year=2017/month=3/part-00000.parquet"
        )
        .await
        .as_ref(),
        b"previous songplays"
    );
}

#[tokio::test]
async fn test_publish_failure_on_first_run_leaves_nothing() {
    let store = Arc::new(CopyRefusingStore::new("lake/time"));
    let location = StorageLocation::new(store.clone(), "lake", "memory");
    let sink = ObjectStoreSink::new(location, ParquetWriterConfig::default());
    let batches = star_schema_batches(&sample_schema()).unwrap();

    let result = sink.write_relations(&batches).await;
    match result {
        Err(Error::WriteFailure { relation, .. }) => assert_eq!(relation, "time"),
        other => panic!("expected WriteFailure, got {other:?}"),
    }

    assert_eq!(list_store(&*store, "lake").await, Vec::<String>::new());
}
