use super::error::DataError;
use super::model::{Limit, Record, TagFilter};

// ---------------------------------------------------------------------------
// Latest position across floors
// ---------------------------------------------------------------------------

/// The record with the greatest timestamp.
///
/// When several records share that timestamp the one appearing last in
/// `records` wins, which is what a stable ascending sort followed by
/// taking the final element would give.
pub fn latest_position(records: &[Record]) -> Result<&Record, DataError> {
    records
        .iter()
        .reduce(|best, rec| if rec.timestamp >= best.timestamp { rec } else { best })
        .ok_or(DataError::EmptyDataset)
}

// ---------------------------------------------------------------------------
// History filter for one floor
// ---------------------------------------------------------------------------

/// Distinct tags in order of first appearance.
pub fn tags_in_order(records: &[Record]) -> Vec<&str> {
    let mut tags: Vec<&str> = Vec::new();
    for rec in records {
        if !tags.contains(&rec.tag.as_str()) {
            tags.push(&rec.tag);
        }
    }
    tags
}

/// Select the positions to plot for one floor.
///
/// Each tag's records are sorted oldest first and cut to the most recent
/// `limit`. With [`TagFilter::All`] every tag is processed independently
/// and the groups are concatenated in order of first appearance.
pub fn history(records: &[Record], tag: &TagFilter, limit: Limit) -> Vec<Record> {
    match tag {
        TagFilter::Tag(t) => tag_history(records, t, limit),
        TagFilter::All => tags_in_order(records)
            .into_iter()
            .flat_map(|t| tag_history(records, t, limit))
            .collect(),
    }
}

fn tag_history(records: &[Record], tag: &str, limit: Limit) -> Vec<Record> {
    let mut group: Vec<Record> = records.iter().filter(|r| r.tag == tag).cloned().collect();
    group.sort_by_key(|r| r.timestamp);
    if let Limit::Count(n) = limit {
        let skip = group.len().saturating_sub(n.get());
        group.drain(..skip);
    }
    group
}
