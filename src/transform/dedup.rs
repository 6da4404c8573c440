//! Sort-then-group deduplication

/// Keep one row per key: the one with the greatest ordering value
///
/// Rows are `(key, order, row)` triples. They are sorted by `(key, order)` and
/// the last row of every key group survives, so the result is sorted by key and
/// independent of input order as long as `order` is unique within a key.
pub fn keep_last<K: Ord, O: Ord, T>(mut keyed: Vec<(K, O, T)>) -> Vec<T> {
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut kept: Vec<(K, T)> = Vec::with_capacity(keyed.len());
    for (key, _, row) in keyed {
        if let Some(last) = kept.last_mut() {
            if last.0 == key {
                last.1 = row;
                continue;
            }
        }
        kept.push((key, row));
    }

    kept.into_iter().map(|(_, row)| row).collect()
}
