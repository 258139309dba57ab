use std::collections::HashMap;

use super::model::{RankedRecord, Record};

/// Attach a recency rank and opacity to every record.
///
/// Expects each tag's records to be in ascending timestamp order, as
/// [`history`](super::filter::history) leaves them. `order` counts up
/// from 0 within a tag; `alpha` is its percentile rank, so the newest
/// record of a tag is fully opaque and a lone record gets 1.0. Input
/// order is kept.
pub fn rank(records: Vec<Record>) -> Vec<RankedRecord> {
    let mut group_sizes: HashMap<String, usize> = HashMap::new();
    for rec in &records {
        *group_sizes.entry(rec.tag.clone()).or_default() += 1;
    }

    let mut seen: HashMap<String, usize> = HashMap::with_capacity(group_sizes.len());
    records
        .into_iter()
        .map(|record| {
            let slot = seen.entry(record.tag.clone()).or_default();
            let order = *slot;
            *slot += 1;
            let size = group_sizes[&record.tag];
            RankedRecord {
                alpha: (order + 1) as f64 / size as f64,
                order,
                record,
            }
        })
        .collect()
}
