use std::collections::BTreeSet;

use crate::data::error::DataError;
use crate::data::fade::rank;
use crate::data::filter::{history, latest_position};
use crate::data::loader::FeedSource;
use crate::data::model::{Dataset, Floor, RankedRecord, Record, Selection};
use crate::data::sanitize::sanitize;

// ---------------------------------------------------------------------------
// One full dashboard refresh
// ---------------------------------------------------------------------------

/// Everything the UI needs to draw one refresh.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub selection: Selection,
    /// Most recent position on any floor.
    pub latest: Record,
    /// Sorted distinct tags on the selected floor (the UI prepends "All").
    pub tag_options: Vec<String>,
    /// Ranked history, oldest first so newer points are drawn on top.
    pub chart: Vec<RankedRecord>,
    /// Same rows, newest first.
    pub table: Vec<RankedRecord>,
    pub title: String,
}

/// Load both floors and prepare the view for `selection`.
///
/// Nothing is reused between calls: every run fetches each feed again.
pub fn run<S: FeedSource + ?Sized>(
    source: &S,
    selection: &Selection,
) -> Result<DashboardView, DataError> {
    let mut floors: Vec<(Floor, Dataset)> = Vec::with_capacity(Floor::ALL.len());
    for floor in Floor::ALL {
        let rows = source.load_rows(floor)?;
        floors.push((floor, sanitize(&rows, floor)));
    }

    let all: Dataset = floors.iter().flat_map(|(_, ds)| ds.iter().cloned()).collect();
    let latest = latest_position(&all)?.clone();

    let floor_data: &[Record] = floors
        .iter()
        .find(|(f, _)| *f == selection.floor)
        .map(|(_, ds)| ds.as_slice())
        .unwrap_or(&[]);

    let tag_options: Vec<String> = floor_data
        .iter()
        .map(|r| r.tag.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let ranked = rank(history(floor_data, &selection.tag, selection.limit));

    let mut chart = ranked;
    chart.sort_by_key(|r| r.record.timestamp);
    let mut table = chart.clone();
    table.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));

    log::info!(
        "Refreshed {} floor (tag {}, limit {}): {} of {} positions shown",
        selection.floor,
        selection.tag,
        selection.limit,
        chart.len(),
        floor_data.len()
    );

    Ok(DashboardView {
        selection: selection.clone(),
        latest,
        tag_options,
        chart,
        table,
        title: selection.title(),
    })
}
