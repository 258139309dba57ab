use eframe::egui::{Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::TagColors;
use crate::data::model::{RankedRecord, TIMESTAMP_DISPLAY};

const HEADERS: [&str; 7] = ["Tag", "X", "Y", "Timestamp", "Floor", "Order", "Alpha"];

/// Filtered positions, newest first.
pub fn history_table(ui: &mut Ui, rows: &[RankedRecord], colors: Option<&TagColors>) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let ranked = &rows[row.index()];
                let rec = &ranked.record;

                let mut tag = RichText::new(&rec.tag);
                if let Some(c) = colors {
                    tag = tag.color(c.color_for(&rec.tag));
                }
                row.col(|ui| {
                    ui.label(tag);
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", rec.x));
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", rec.y));
                });
                row.col(|ui| {
                    ui.label(rec.timestamp.format(TIMESTAMP_DISPLAY).to_string());
                });
                row.col(|ui| {
                    ui.label(rec.floor.label());
                });
                row.col(|ui| {
                    ui.label(ranked.order.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.3}", ranked.alpha));
                });
            });
        });
}
