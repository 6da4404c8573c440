//! Hive-style partition splitting
//!
//! A partitioned relation is split into one batch per distinct combination of
//! its partition columns. The directory is built as `key=value/...` and the
//! partition columns are removed from the batch, since readers recover them
//! from the path.

use crate::error::{Error, Result};
use arrow::array::BooleanArray;
use arrow::compute::filter_record_batch;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use std::collections::BTreeMap;

/// Directory value used for a null partition key
pub const DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// One partition of a relation
#[derive(Debug, Clone)]
pub struct PartitionBatch {
    /// Relative directory, e.g. `year=2018/month=11`; empty when unpartitioned
    pub dir: String,
    /// Rows of the partition without the partition columns
    pub batch: RecordBatch,
}

/// Build a Hive-style partition directory from key/value pairs
///
/// Format: `{key}={value}/{key}={value}`
pub fn build_partition_dir(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a batch by the given partition columns
///
/// Partitions come back ordered by their key values. Rows keep their relative
/// order inside each partition. With no keys the whole batch is one partition
/// with an empty directory.
pub fn split_by_partition(batch: &RecordBatch, keys: &[&str]) -> Result<Vec<PartitionBatch>> {
    if keys.is_empty() {
        return Ok(vec![PartitionBatch {
            dir: String::new(),
            batch: batch.clone(),
        }]);
    }

    let schema = batch.schema();
    let key_indices = keys
        .iter()
        .map(|key| {
            schema.index_of(key).map_err(|_| {
                Error::output(format!("Partition column '{key}' missing from batch"))
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    let kept: Vec<usize> = (0..schema.fields().len())
        .filter(|i| !key_indices.contains(i))
        .collect();

    // Group rows by their key values; BTreeMap keeps the partitions sorted
    let mut groups: BTreeMap<Vec<PartitionValue>, Vec<usize>> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let values = key_indices
            .iter()
            .map(|&col| PartitionValue::of(batch, col, row))
            .collect::<Result<Vec<_>>>()?;
        groups.entry(values).or_default().push(row);
    }

    let mut partitions = Vec::with_capacity(groups.len());
    for (values, rows) in groups {
        let mut mask = vec![false; batch.num_rows()];
        for row in rows {
            mask[row] = true;
        }
        let filtered = filter_record_batch(batch, &BooleanArray::from(mask))?;
        let projected = filtered.project(&kept)?;

        let pairs: Vec<(&str, String)> = keys
            .iter()
            .zip(values)
            .map(|(key, value)| (*key, value.to_string()))
            .collect();

        partitions.push(PartitionBatch {
            dir: build_partition_dir(&pairs),
            batch: projected,
        });
    }

    Ok(partitions)
}

/// Value of one partition column for one row
///
/// Integers sort numerically, so `month=2` comes before `month=10`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PartitionValue {
    Null,
    Int(i64),
    Text(String),
}

impl PartitionValue {
    fn of(batch: &RecordBatch, col: usize, row: usize) -> Result<Self> {
        use arrow::array::{Array, Int32Array, Int64Array};

        let array = batch.column(col);
        if array.is_null(row) {
            return Ok(Self::Null);
        }
        if let Some(ints) = array.as_any().downcast_ref::<Int32Array>() {
            return Ok(Self::Int(i64::from(ints.value(row))));
        }
        if let Some(ints) = array.as_any().downcast_ref::<Int64Array>() {
            return Ok(Self::Int(ints.value(row)));
        }
        Ok(Self::Text(array_value_to_string(array, row)?))
    }
}

impl std::fmt::Display for PartitionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "{DEFAULT_PARTITION}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}
