/// Data layer: feed loading, sanitizing, filtering and fade ranking.
///
/// Architecture:
/// ```text
///  2nd / 3rd floor CSV feeds
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch CSV → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ sanitize  │  parse X / Y / Timestamp, stamp floor → Dataset
///   └──────────┘
///        │
///        ├──────────────► filter::latest_position  (both floors)
///        ▼
///   ┌──────────┐
///   │  filter   │  per-tag sort + limit → Vec<Record>  (one floor)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   fade    │  order / alpha per tag → Vec<RankedRecord>
///   └──────────┘
/// ```

pub mod error;
pub mod fade;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sanitize;
