use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::background::Backgrounds;
use crate::data::model::{Floor, Limit, TagFilter, TIMESTAMP_DISPLAY};
use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – floor / tag / limit selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Floor Tag Viewer");
    ui.separator();

    // ---- Floor ----
    ui.strong("Select Floor:");
    let mut floor = state.selection.floor;
    for f in Floor::ALL {
        ui.radio_value(&mut floor, f, f.label());
    }
    state.set_floor(floor);
    ui.separator();

    // ---- Tag ----
    ui.strong("Select Tag:");
    let tag_options: Vec<String> = state
        .view
        .as_ref()
        .map(|v| v.tag_options.clone())
        .unwrap_or_default();
    let mut tag = state.selection.tag.clone();
    egui::ComboBox::from_id_salt("tag_choice")
        .selected_text(tag.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut tag, TagFilter::All, "All");
            for t in &tag_options {
                ui.selectable_value(&mut tag, TagFilter::Tag(t.clone()), t);
            }
        });
    state.set_tag(tag);
    ui.separator();

    // ---- Limit ----
    ui.strong("How many latest positions?");
    let mut limit = state.selection.limit;
    egui::ComboBox::from_id_salt("limit_choice")
        .selected_text(limit.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for option in Limit::options() {
                ui.selectable_value(&mut limit, option, option.to_string());
            }
        });
    state.set_limit(limit);
    ui.separator();

    ui.add_enabled_ui(state.can_fetch(), |ui: &mut Ui| {
        if ui.button("⟳ Refresh").clicked() {
            state.refresh();
        }
    });

    ui.add_space(8.0);
    ui.small("Feeds:");
    for f in Floor::ALL {
        ui.small(format!("{f}: {}", state.feed_label(f)));
    }
}

// ---------------------------------------------------------------------------
// Central panel – latest position, history chart, table
// ---------------------------------------------------------------------------

/// Render the dashboard body, or the error from the last run.
pub fn dashboard(ui: &mut Ui, state: &AppState, backgrounds: &Backgrounds) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) => {
                ui.label(RichText::new(msg).color(Color32::RED).heading());
            }
            None => {
                ui.heading("Waiting for floor feeds…");
            }
        });
        return;
    };
    let colors = state.tag_colors.as_ref();
    let layout = &state.config.chart;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Latest position ----
            ui.heading("🏢 Latest Tag Position");
            let latest = &view.latest;
            ui.label(
                RichText::new(format!(
                    "{} at X={:.2}, Y={:.2} on {} floor (Timestamp: {})",
                    latest.tag,
                    latest.x,
                    latest.y,
                    latest.floor,
                    latest.timestamp.format(TIMESTAMP_DISPLAY)
                ))
                .strong()
                .color(Color32::from_rgb(40, 160, 70)),
            );
            plot::latest_plot(ui, latest, colors, layout, backgrounds);

            ui.separator();

            // ---- History ----
            ui.heading("📊 Floor Tag Viewer");
            ui.strong(&view.title);
            plot::history_plot(
                ui,
                view.selection.floor,
                &view.chart,
                colors,
                layout,
                backgrounds,
            );
            ui.add_space(8.0);
            table::history_table(ui, &view.table, colors);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load floor feed from CSV…").clicked() {
                open_feed_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} floor: {} positions shown",
                view.selection.floor,
                view.chart.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_feed_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Open {} floor feed", state.selection.floor))
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.use_feed_file(path);
    }
}
