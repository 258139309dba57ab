use eframe::egui::{Color32, Ui, Vec2};
use egui_plot::{Legend, MarkerShape, Plot, PlotBounds, PlotImage, PlotPoint, PlotUi, Points};

use crate::background::Backgrounds;
use crate::color::{faded, TagColors};
use crate::config::ChartLayout;
use crate::data::model::{Floor, RankedRecord, Record, TIMESTAMP_DISPLAY};

const LATEST_RADIUS: f32 = 10.0;
const HISTORY_RADIUS: f32 = 5.0;
const PLOT_SIZE: f32 = 600.0;

/// How far (in plot units) the cursor may sit from a record and still count
/// as hovering it.
const HOVER_TOLERANCE: f64 = 0.5;

/// What the hover label needs to know about a plotted record.
#[derive(Debug, Clone, PartialEq)]
struct HoverPoint {
    x: f64,
    y: f64,
    tag: String,
    timestamp: String,
}

impl From<&Record> for HoverPoint {
    fn from(rec: &Record) -> Self {
        Self {
            x: rec.x,
            y: rec.y,
            tag: rec.tag.clone(),
            timestamp: rec.timestamp.format(TIMESTAMP_DISPLAY).to_string(),
        }
    }
}

/// Label for a hovered plot position: tag, coordinates and timestamp of the
/// closest record, or bare coordinates when nothing is close. Later records
/// win ties since they are drawn on top.
fn hover_label(points: &[HoverPoint], x: f64, y: f64) -> String {
    let nearest = points
        .iter()
        .map(|p| ((p.x - x).hypot(p.y - y), p))
        .filter(|(dist, _)| *dist <= HOVER_TOLERANCE)
        .reduce(|best, cur| if cur.0 <= best.0 { cur } else { best });

    match nearest {
        Some((_, p)) => format!(
            "{}\nX={:.2}, Y={:.2}\nTimestamp: {}",
            p.tag, p.x, p.y, p.timestamp
        ),
        None => format!("X={x:.2}, Y={y:.2}"),
    }
}

/// Newest row of each tag, in order of the tag's first appearance. These
/// carry the legend entries at full colour.
fn legend_anchors(rows: &[RankedRecord]) -> Vec<&RankedRecord> {
    let mut anchors: Vec<&RankedRecord> = Vec::new();
    for row in rows {
        match anchors.iter_mut().find(|a| a.record.tag == row.record.tag) {
            Some(slot) if row.order >= slot.order => *slot = row,
            Some(_) => {}
            None => anchors.push(row),
        }
    }
    anchors
}

// ---------------------------------------------------------------------------
// Floor plots (central panel)
// ---------------------------------------------------------------------------

/// Single large marker for the most recent fix on any floor.
pub fn latest_plot(
    ui: &mut Ui,
    latest: &Record,
    colors: Option<&TagColors>,
    layout: &ChartLayout,
    backgrounds: &Backgrounds,
) {
    let color = colors.map_or(Color32::LIGHT_BLUE, |c| c.color_for(&latest.tag));

    let hover = vec![HoverPoint::from(latest)];
    show_floor_plot(ui, "latest_plot", layout, hover, |plot_ui| {
        draw_background(plot_ui, backgrounds, latest.floor, layout);

        // Black ring behind the marker stands in for an outline.
        plot_ui.points(
            Points::new(vec![[latest.x, latest.y]])
                .shape(MarkerShape::Circle)
                .radius(LATEST_RADIUS + 2.0)
                .color(Color32::BLACK),
        );
        plot_ui.points(
            Points::new(vec![[latest.x, latest.y]])
                .shape(MarkerShape::Circle)
                .radius(LATEST_RADIUS)
                .color(color)
                .name(&latest.tag),
        );
    });
}

/// Faded history for one floor, one point per retained record.
///
/// The faded points are unnamed; each tag's legend entry comes from a
/// full-colour marker over its newest position.
pub fn history_plot(
    ui: &mut Ui,
    floor: Floor,
    rows: &[RankedRecord],
    colors: Option<&TagColors>,
    layout: &ChartLayout,
    backgrounds: &Backgrounds,
) {
    let base = |tag: &str| colors.map_or(Color32::LIGHT_BLUE, |c| c.color_for(tag));
    let hover = rows.iter().map(|row| HoverPoint::from(&row.record)).collect();

    show_floor_plot(ui, "history_plot", layout, hover, |plot_ui| {
        draw_background(plot_ui, backgrounds, floor, layout);

        for row in rows {
            let rec = &row.record;
            plot_ui.points(
                Points::new(vec![[rec.x, rec.y]])
                    .shape(MarkerShape::Circle)
                    .radius(HISTORY_RADIUS)
                    .color(faded(base(&rec.tag), row.alpha)),
            );
        }

        for anchor in legend_anchors(rows) {
            let rec = &anchor.record;
            plot_ui.points(
                Points::new(vec![[rec.x, rec.y]])
                    .shape(MarkerShape::Circle)
                    .radius(HISTORY_RADIUS)
                    .color(base(&rec.tag))
                    .name(&rec.tag),
            );
        }
    });
}

/// Fixed-range, non-interactive scatter plot sized like a floor plan.
fn show_floor_plot(
    ui: &mut Ui,
    id: &str,
    layout: &ChartLayout,
    hover: Vec<HoverPoint>,
    add_contents: impl FnOnce(&mut PlotUi),
) {
    let [x0, x1] = layout.x_range;
    let [y0, y1] = layout.y_range;
    Plot::new(id)
        .legend(Legend::default())
        .width(PLOT_SIZE)
        .height(PLOT_SIZE)
        .include_x(x0)
        .include_x(x1)
        .include_y(y0)
        .include_y(y1)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .label_formatter(move |_name, value| hover_label(&hover, value.x, value.y))
        .show(ui, |plot_ui| {
            add_contents(plot_ui);
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, y0], [x1, y1]));
        });
}

fn draw_background(
    plot_ui: &mut PlotUi,
    backgrounds: &Backgrounds,
    floor: Floor,
    layout: &ChartLayout,
) {
    let Some(texture) = backgrounds.get(floor) else {
        return;
    };
    let [cx, cy] = layout.image_center();
    let [w, h] = layout.image_size;
    plot_ui.image(
        PlotImage::new(
            texture.id(),
            PlotPoint::new(cx, cy),
            Vec2::new(w as f32, h as f32),
        )
        .tint(Color32::from_white_alpha(
            (layout.image_opacity.clamp(0.0, 1.0) * 255.0) as u8,
        )),
    );
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(tag: &str, x: f64, y: f64, minute: u32) -> Record {
        Record {
            tag: tag.into(),
            x,
            y,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, minute, 0)
                .unwrap(),
            floor: Floor::Second,
        }
    }

    fn ranked(tag: &str, minute: u32, order: usize, alpha: f64) -> RankedRecord {
        RankedRecord {
            record: record(tag, minute as f64, 1.0, minute),
            order,
            alpha,
        }
    }

    #[test]
    fn hover_shows_the_record_timestamp() {
        let points = vec![
            HoverPoint::from(&record("Tag1", 5.0, 10.0, 0)),
            HoverPoint::from(&record("Tag2", 20.0, 30.0, 15)),
        ];
        assert_eq!(
            hover_label(&points, 20.0, 30.0),
            "Tag2\nX=20.00, Y=30.00\nTimestamp: 2024-01-01 10:15:00"
        );
        assert_eq!(
            hover_label(&points, 5.1, 9.9),
            "Tag1\nX=5.00, Y=10.00\nTimestamp: 2024-01-01 10:00:00"
        );
    }

    #[test]
    fn hover_away_from_records_shows_coordinates_only() {
        let points = vec![HoverPoint::from(&record("Tag1", 5.0, 10.0, 0))];
        assert_eq!(hover_label(&points, 30.0, 40.0), "X=30.00, Y=40.00");
        assert_eq!(hover_label(&[], 1.0, 2.0), "X=1.00, Y=2.00");
    }

    #[test]
    fn hover_on_overlapping_records_picks_the_newer() {
        let points = vec![
            HoverPoint::from(&record("Tag1", 5.0, 5.0, 0)),
            HoverPoint::from(&record("Tag1", 5.0, 5.0, 30)),
        ];
        assert!(hover_label(&points, 5.0, 5.0).ends_with("10:30:00"));
    }

    #[test]
    fn legend_uses_each_tags_newest_row() {
        let rows = vec![
            ranked("A", 0, 0, 1.0 / 3.0),
            ranked("B", 1, 0, 0.5),
            ranked("A", 2, 1, 2.0 / 3.0),
            ranked("B", 3, 1, 1.0),
            ranked("A", 4, 2, 1.0),
        ];
        let anchors = legend_anchors(&rows);
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].record.tag, "A");
        assert_eq!(anchors[0].order, 2);
        assert_eq!(anchors[0].alpha, 1.0);
        assert_eq!(anchors[1].record.tag, "B");
        assert_eq!(anchors[1].order, 1);
        assert_eq!(anchors[1].alpha, 1.0);
    }

    #[test]
    fn legend_is_empty_without_rows() {
        assert!(legend_anchors(&[]).is_empty());
    }
}
