use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::FeedLocation;
use crate::data::model::PerFloor;

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "floor-tracker.json";

const SHEET_BASE: &str = "https://docs.google.com/spreadsheets/d/e/\
    2PACX-1vTAu3Nv_Z7LvgPJ_YtIM14b5xrro004iNc_xjs6_Fgxn2NE_KTktnkyADzeGSgD99RYO6RKOZsYOpsN/pub";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Read-only settings for feeds and charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub feeds: PerFloor<FeedLocation>,
    /// Floor-plan image drawn under each floor's points.
    pub backgrounds: PerFloor<PathBuf>,
    /// Fixed colours for known tags as `[r, g, b]`; others use the palette.
    pub tag_colors: BTreeMap<String, [u8; 3]>,
    pub request_timeout_secs: u64,
    pub chart: ChartLayout,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feeds: PerFloor {
                second: FeedLocation::Url(format!(
                    "{SHEET_BASE}?gid=1505254047&single=true&output=csv"
                )),
                third: FeedLocation::Url(format!(
                    "{SHEET_BASE}?gid=2010753039&single=true&output=csv"
                )),
            },
            backgrounds: PerFloor {
                second: PathBuf::from("2ndfloor.jpg"),
                third: PathBuf::from("3rdfloor.jpg"),
            },
            tag_colors: BTreeMap::from([
                ("Tag1".to_string(), [0, 0, 255]),
                ("Tag2".to_string(), [255, 0, 0]),
            ]),
            request_timeout_secs: 30,
            chart: ChartLayout::default(),
        }
    }
}

impl DashboardConfig {
    /// Read `path`, falling back to defaults for any missing key.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load [`CONFIG_FILE`] if present, otherwise the built-in defaults.
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Using configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Plot geometry shared by both charts, in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    /// Top-left corner of the floor plan.
    pub image_origin: [f64; 2],
    pub image_size: [f64; 2],
    pub image_opacity: f32,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            x_range: [-10.0, 40.0],
            y_range: [0.0, 55.0],
            image_origin: [-10.0, 50.0],
            image_size: [50.0, 50.0],
            image_opacity: 0.5,
        }
    }
}

impl ChartLayout {
    /// Centre of the floor plan; egui_plot anchors images at their centre.
    pub fn image_center(&self) -> [f64; 2] {
        [
            self.image_origin[0] + self.image_size[0] / 2.0,
            self.image_origin[1] - self.image_size[1] / 2.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_point_at_published_sheets() {
        let config = DashboardConfig::default();
        match &config.feeds.second {
            FeedLocation::Url(url) => assert!(url.ends_with("gid=1505254047&single=true&output=csv")),
            other => panic!("unexpected feed {other:?}"),
        }
        assert_eq!(config.backgrounds.third, PathBuf::from("3rdfloor.jpg"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn image_sits_inside_the_axes() {
        let layout = ChartLayout::default();
        assert_eq!(layout.image_center(), [15.0, 25.0]);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "feeds": {{ "2nd": {{ "file": "sample/2nd.csv" }}, "3rd": {{ "file": "sample/3rd.csv" }} }},
                 "request_timeout_secs": 5 }}"#
        )
        .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.feeds.third, FeedLocation::File("sample/3rd.csv".into()));
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.chart, ChartLayout::default());
        assert_eq!(config.tag_colors["Tag2"], [255, 0, 0]);
    }

    #[test]
    fn broken_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
