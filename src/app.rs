use eframe::egui;

use crate::background::Backgrounds;
use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FloorTrackerApp {
    pub state: AppState,
    backgrounds: Backgrounds,
}

impl FloorTrackerApp {
    /// Load floor plans and run the pipeline once for the default selection.
    pub fn new(ctx: &egui::Context, config: DashboardConfig) -> Self {
        let backgrounds = Backgrounds::load(ctx, &config.backgrounds);
        let mut state = AppState::new(config);
        state.refresh();
        Self { state, backgrounds }
    }
}

impl eframe::App for FloorTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: floor / tag / limit ----
        egui::SidePanel::left("selection_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::dashboard(ui, &self.state, &self.backgrounds);
        });
    }
}
