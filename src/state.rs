use std::path::PathBuf;

use crate::color::TagColors;
use crate::config::DashboardConfig;
use crate::data::error::DataError;
use crate::data::loader::{FeedLoader, FeedLocation, FeedSource};
use crate::data::model::{Floor, Limit, Selection, TagFilter};
use crate::pipeline::{self, DashboardView};

/// Run the pipeline; if the chosen tag is gone from the floor's data, fall
/// back to "All" and run once more.
fn run_with_valid_tag<S: FeedSource + ?Sized>(
    source: &S,
    selection: &mut Selection,
) -> Result<DashboardView, DataError> {
    let view = pipeline::run(source, selection)?;
    if let TagFilter::Tag(tag) = &selection.tag {
        if !view.tag_options.contains(tag) {
            log::info!(
                "Tag {tag} is no longer on the {} floor, showing all tags",
                selection.floor
            );
            selection.tag = TagFilter::All;
            return pipeline::run(source, selection);
        }
    }
    Ok(view)
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Read-only settings (feed locations may be overridden from the File menu).
    pub config: DashboardConfig,

    /// Feed fetcher; `None` if the HTTP client could not be built.
    loader: Option<FeedLoader>,

    /// What the side panel currently has selected.
    pub selection: Selection,

    /// Result of the last successful run; cleared when a run fails.
    pub view: Option<DashboardView>,

    /// Colours for the tags in `view`.
    pub tag_colors: Option<TagColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let (loader, status_message) =
            match FeedLoader::new(config.feeds.clone(), config.request_timeout()) {
                Ok(loader) => (Some(loader), None),
                Err(e) => {
                    log::error!("Cannot fetch feeds: {e:#}");
                    (None, Some(format!("Error: {e:#}")))
                }
            };
        Self {
            config,
            loader,
            selection: Selection::default(),
            view: None,
            tag_colors: None,
            status_message,
        }
    }

    /// Run the whole pipeline for the current selection.
    pub fn refresh(&mut self) {
        let Some(loader) = &self.loader else {
            return;
        };
        let result = run_with_valid_tag(loader, &mut self.selection);
        self.apply(result);
    }

    fn apply(&mut self, result: Result<DashboardView, DataError>) {
        match result {
            Ok(view) => {
                let tags = view
                    .chart
                    .iter()
                    .map(|r| r.record.tag.as_str())
                    .chain(std::iter::once(view.latest.tag.as_str()));
                self.tag_colors = Some(TagColors::new(tags, &self.config.tag_colors));
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => {
                if e.is_data_source() {
                    log::error!("Dashboard refresh failed: {e}");
                } else {
                    log::warn!("Dashboard refresh produced nothing: {e}");
                }
                self.view = None;
                self.tag_colors = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Switch floors. The tag list belongs to the old floor, so the tag
    /// choice goes back to "All".
    pub fn set_floor(&mut self, floor: Floor) {
        if self.selection.floor == floor {
            return;
        }
        self.selection.floor = floor;
        self.selection.tag = TagFilter::All;
        self.refresh();
    }

    pub fn set_tag(&mut self, tag: TagFilter) {
        if self.selection.tag != tag {
            self.selection.tag = tag;
            self.refresh();
        }
    }

    pub fn set_limit(&mut self, limit: Limit) {
        if self.selection.limit != limit {
            self.selection.limit = limit;
            self.refresh();
        }
    }

    /// Read the selected floor from a local CSV for the rest of the session.
    pub fn use_feed_file(&mut self, path: PathBuf) {
        let floor = self.selection.floor;
        if let Some(loader) = &mut self.loader {
            log::info!("Reading the {floor} floor feed from {}", path.display());
            loader.set_location(floor, FeedLocation::File(path.clone()));
            *self.config.feeds.get_mut(floor) = FeedLocation::File(path);
            self.refresh();
        }
    }

    /// Human-readable location of a floor's feed.
    pub fn feed_label(&self, floor: Floor) -> String {
        match self.loader.as_ref().map(|l| l.location(floor)) {
            Some(FeedLocation::Url(url)) => url.clone(),
            Some(FeedLocation::File(path)) => path.display().to_string(),
            None => "unavailable".to_string(),
        }
    }

    /// Whether a feed fetcher exists at all.
    pub fn can_fetch(&self) -> bool {
        self.loader.is_some()
    }
}
