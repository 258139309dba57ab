use std::fmt;
use std::num::NonZeroUsize;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Floor – which feed a record came from
// ---------------------------------------------------------------------------

/// A building level. Each floor has its own feed and floor-plan image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Floor {
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
}

impl Floor {
    /// Every floor, in display order.
    pub const ALL: [Floor; 2] = [Floor::Second, Floor::Third];

    pub fn label(self) -> &'static str {
        match self {
            Floor::Second => "2nd",
            Floor::Third => "3rd",
        }
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per floor, keyed by floor label when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerFloor<T> {
    #[serde(rename = "2nd")]
    pub second: T,
    #[serde(rename = "3rd")]
    pub third: T,
}

impl<T> PerFloor<T> {
    pub fn get(&self, floor: Floor) -> &T {
        match floor {
            Floor::Second => &self.second,
            Floor::Third => &self.third,
        }
    }

    pub fn get_mut(&mut self, floor: Floor) -> &mut T {
        match floor {
            Floor::Second => &mut self.second,
            Floor::Third => &mut self.third,
        }
    }
}

// ---------------------------------------------------------------------------
// RawRow – one CSV row as the feed delivered it
// ---------------------------------------------------------------------------

/// The four columns we care about, untouched. A missing cell is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub tag: String,
    pub x: String,
    pub y: String,
    pub timestamp: String,
}

impl From<&Record> for RawRow {
    fn from(rec: &Record) -> Self {
        RawRow {
            tag: rec.tag.clone(),
            x: rec.x.to_string(),
            y: rec.y.to_string(),
            timestamp: rec.timestamp.format(TIMESTAMP_DISPLAY).to_string(),
        }
    }
}

/// Layout used when a timestamp is shown or written back out.
pub const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S%.f";

// ---------------------------------------------------------------------------
// Record – one sanitized tag observation
// ---------------------------------------------------------------------------

/// A fully valid position fix. Never mutated once the sanitizer emits it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub tag: String,
    pub x: f64,
    pub y: f64,
    pub timestamp: NaiveDateTime,
    /// Stamped from the feed, never read from the row.
    pub floor: Floor,
}

/// Rows for one or more floors. Order carries no meaning at rest.
pub type Dataset = Vec<Record>;

/// A record retained by the history filter, with its fade attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord {
    pub record: Record,
    /// Zero-based position within the tag group, oldest first.
    pub order: usize,
    /// Percentile of `order` within the tag group, in (0, 1].
    pub alpha: f64,
}

// ---------------------------------------------------------------------------
// Selection – what the user picked in the side panel
// ---------------------------------------------------------------------------

/// Tag restriction for the history view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFilter::All => f.write_str("All"),
            TagFilter::Tag(t) => f.write_str(t),
        }
    }
}

/// How many of the most recent positions to keep per tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Limit {
    Count(NonZeroUsize),
    #[default]
    All,
}

impl Limit {
    /// The choices offered in the UI.
    pub fn options() -> Vec<Limit> {
        [50, 100, 250]
            .into_iter()
            .filter_map(Limit::count)
            .chain([Limit::All])
            .collect()
    }

    /// A numeric limit; `None` for zero.
    pub fn count(n: usize) -> Option<Limit> {
        NonZeroUsize::new(n).map(Limit::Count)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Count(n) => write!(f, "{n}"),
            Limit::All => f.write_str("All"),
        }
    }
}

/// The full set of user choices driving one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub floor: Floor,
    pub tag: TagFilter,
    pub limit: Limit,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            floor: Floor::Second,
            tag: TagFilter::All,
            limit: Limit::All,
        }
    }
}

impl Selection {
    /// Chart title for this selection.
    pub fn title(&self) -> String {
        match self.limit {
            Limit::Count(n) => format!("{} Floor - {} (Last {n} positions)", self.floor, self.tag),
            Limit::All => format!("{} Floor - {} (All positions)", self.floor, self.tag),
        }
    }
}
