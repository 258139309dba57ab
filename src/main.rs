mod app;
mod background;
mod color;
mod config;
mod data;
mod pipeline;
mod state;
mod ui;

use app::FloorTrackerApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Floor Tracker – Tag Positions",
        options,
        Box::new(|cc| Ok(Box::new(FloorTrackerApp::new(&cc.egui_ctx, config)))),
    )
}
