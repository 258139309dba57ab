use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::model::{Floor, PerFloor, RawRow};

/// Columns every feed must carry. Anything else in the sheet is ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Tag", "X", "Y", "Timestamp"];

// ---------------------------------------------------------------------------
// Feed sources
// ---------------------------------------------------------------------------

/// Anything that can hand over the raw rows of a floor's feed.
pub trait FeedSource {
    fn load_rows(&self, floor: Floor) -> Result<Vec<RawRow>, DataError>;
}

/// Where a floor's CSV lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedLocation {
    /// Published spreadsheet CSV export.
    Url(String),
    /// Local CSV file.
    File(PathBuf),
}

/// Fetches each floor's feed from its configured location.
pub struct FeedLoader {
    client: Client,
    feeds: PerFloor<FeedLocation>,
}

impl FeedLoader {
    /// Build a loader with a blocking HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(feeds: PerFloor<FeedLocation>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, feeds })
    }

    pub fn location(&self, floor: Floor) -> &FeedLocation {
        self.feeds.get(floor)
    }

    /// Point a floor at a different feed for the rest of the session.
    pub fn set_location(&mut self, floor: Floor, location: FeedLocation) {
        *self.feeds.get_mut(floor) = location;
    }

    fn fetch_url(&self, floor: Floor, url: &str) -> Result<Vec<RawRow>, DataError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| DataError::Unreachable { floor, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus { floor, status });
        }

        let body = response
            .bytes()
            .map_err(|source| DataError::Unreachable { floor, source })?;
        parse_rows(floor, &body[..])
    }
}

impl FeedSource for FeedLoader {
    fn load_rows(&self, floor: Floor) -> Result<Vec<RawRow>, DataError> {
        let rows = match self.location(floor) {
            FeedLocation::Url(url) => self.fetch_url(floor, url)?,
            FeedLocation::File(path) => {
                let file = std::fs::File::open(path).map_err(|source| DataError::Io {
                    floor,
                    path: path.clone(),
                    source,
                })?;
                parse_rows(floor, file)?
            }
        };
        log::info!("Loaded {} raw rows from the {floor} floor feed", rows.len());
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Read a feed body into raw rows.
///
/// The header row must name `Tag`, `X`, `Y` and `Timestamp` (surrounding
/// whitespace ignored). Short rows are padded with empty cells so the
/// sanitizer can drop them instead of failing the whole feed.
pub fn parse_rows<R: Read>(floor: Floor, input: R) -> Result<Vec<RawRow>, DataError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| DataError::Malformed { floor, source })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DataError::MissingColumn { floor, column: name })
    };
    let [tag_idx, x_idx, y_idx, ts_idx] = [
        column(REQUIRED_COLUMNS[0])?,
        column(REQUIRED_COLUMNS[1])?,
        column(REQUIRED_COLUMNS[2])?,
        column(REQUIRED_COLUMNS[3])?,
    ];

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| DataError::Malformed { floor, source })?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push(RawRow {
            tag: cell(tag_idx),
            x: cell(x_idx),
            y: cell(y_idx),
            timestamp: cell(ts_idx),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::TcpListener;

    use super::*;

    /// Serve a single HTTP response on a local port and return the feed URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/csv\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/feed.csv")
    }

    fn url_loader(url: &str) -> FeedLoader {
        let feeds = PerFloor {
            second: FeedLocation::Url(url.to_string()),
            third: FeedLocation::Url(url.to_string()),
        };
        FeedLoader::new(feeds, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn reads_required_columns_and_ignores_the_rest() {
        let csv = "Anchor, Tag ,X,Y,Timestamp,Battery\n\
                   a1,T1,5,10,2024-01-01 10:00,88\n\
                   a2,T2,bad,,2024-01-01 11:00,87\n";
        let rows = parse_rows(Floor::Second, csv.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                RawRow {
                    tag: "T1".into(),
                    x: "5".into(),
                    y: "10".into(),
                    timestamp: "2024-01-01 10:00".into(),
                },
                RawRow {
                    tag: "T2".into(),
                    x: "bad".into(),
                    y: "".into(),
                    timestamp: "2024-01-01 11:00".into(),
                },
            ]
        );
    }

    #[test]
    fn short_rows_get_empty_cells() {
        let csv = "Tag,X,Y,Timestamp\nT1,1\n";
        let rows = parse_rows(Floor::Third, csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].x, "1");
        assert_eq!(rows[0].y, "");
        assert_eq!(rows[0].timestamp, "");
    }

    #[test]
    fn header_only_feed_has_no_rows() {
        let rows = parse_rows(Floor::Second, "Tag,X,Y,Timestamp\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn missing_column_is_a_data_source_error() {
        let err = parse_rows(Floor::Third, "Tag,X,Timestamp\nT1,1,2024-01-01\n".as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn { floor: Floor::Third, column: "Y" }
        ));
        assert!(err.is_data_source());
        assert_eq!(err.to_string(), "3rd floor feed has no 'Y' column");
    }

    #[test]
    fn empty_body_is_rejected() {
        let err = parse_rows(Floor::Second, "".as_bytes()).unwrap_err();
        assert!(err.is_data_source());
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let body: &[u8] = b"Tag,X,Y,Timestamp\n\xff\xfe,1,2,2024-01-01\n";
        let err = parse_rows(Floor::Second, body).unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[test]
    fn file_feed_loads_through_the_trait() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Tag,X,Y,Timestamp").unwrap();
        writeln!(file, "T9,1.5,2.5,2024-03-01 08:00:00").unwrap();

        let feeds = PerFloor {
            second: FeedLocation::File(file.path().to_path_buf()),
            third: FeedLocation::File(file.path().to_path_buf()),
        };
        let loader = FeedLoader::new(feeds, Duration::from_secs(1)).unwrap();
        let rows = loader.load_rows(Floor::Second).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tag, "T9");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let feeds = PerFloor {
            second: FeedLocation::File(path.clone()),
            third: FeedLocation::File(path),
        };
        let loader = FeedLoader::new(feeds, Duration::from_secs(1)).unwrap();
        let err = loader.load_rows(Floor::Third).unwrap_err();
        assert!(matches!(err, DataError::Io { floor: Floor::Third, .. }));
    }

    #[test]
    fn feed_location_json_shape() {
        let loc: FeedLocation = serde_json::from_str(r#"{"url": "https://example.com/a.csv"}"#).unwrap();
        assert_eq!(loc, FeedLocation::Url("https://example.com/a.csv".into()));
        let loc: FeedLocation = serde_json::from_str(r#"{"file": "sample/2nd.csv"}"#).unwrap();
        assert_eq!(loc, FeedLocation::File("sample/2nd.csv".into()));
    }

    #[test]
    fn url_feed_parses_the_body() {
        let url = serve_once(
            "200 OK",
            "Tag,X,Y,Timestamp\nT1,1,2,2024-01-01 10:00\nT2,3,4,2024-01-01 11:00\n",
        );
        let rows = url_loader(&url).load_rows(Floor::Second).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].tag, "T2");
        assert_eq!(rows[1].timestamp, "2024-01-01 11:00");
    }

    #[test]
    fn server_error_is_an_http_status_error() {
        let url = serve_once("500 Internal Server Error", "");
        let err = url_loader(&url).load_rows(Floor::Second).unwrap_err();
        match &err {
            DataError::HttpStatus { floor, status } => {
                assert_eq!(*floor, Floor::Second);
                assert_eq!(status.as_u16(), 500);
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
        assert!(err.is_data_source());
        assert_eq!(
            err.to_string(),
            "2nd floor feed answered with HTTP 500 Internal Server Error"
        );
    }

    #[test]
    fn closed_port_is_unreachable() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let err = url_loader(&format!("http://{addr}/feed.csv"))
            .load_rows(Floor::Third)
            .unwrap_err();
        assert!(matches!(err, DataError::Unreachable { floor: Floor::Third, .. }));
        assert!(err.is_data_source());
        assert!(err.to_string().starts_with("3rd floor feed is unreachable: "));
    }

    #[test]
    fn bad_body_behind_a_good_status_is_still_checked() {
        let url = serve_once("200 OK", "Tag,X,Timestamp\nT1,1,2024-01-01\n");
        let err = url_loader(&url).load_rows(Floor::Third).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn { floor: Floor::Third, column: "Y" }
        ));
    }
}
