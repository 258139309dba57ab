use std::path::PathBuf;

use thiserror::Error;

use super::model::Floor;

/// Everything that can stop a pipeline run.
///
/// Bad cells inside an otherwise readable feed are not errors; the
/// sanitizer drops those rows.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{floor} floor feed is unreachable: {source}")]
    Unreachable {
        floor: Floor,
        #[source]
        source: reqwest::Error,
    },

    #[error("{floor} floor feed answered with HTTP {status}")]
    HttpStatus {
        floor: Floor,
        status: reqwest::StatusCode,
    },

    #[error("cannot read {floor} floor feed at {}: {source}", .path.display())]
    Io {
        floor: Floor,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{floor} floor feed is not valid CSV: {source}")]
    Malformed {
        floor: Floor,
        #[source]
        source: csv::Error,
    },

    #[error("{floor} floor feed has no '{column}' column")]
    MissingColumn { floor: Floor, column: &'static str },

    #[error("no valid tag positions on any floor")]
    EmptyDataset,
}

impl DataError {
    /// True when the feed itself could not be fetched or read as a table.
    pub fn is_data_source(&self) -> bool {
        !matches!(self, DataError::EmptyDataset)
    }
}
