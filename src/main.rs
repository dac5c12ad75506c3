mod app;

use std::path::PathBuf;

use app::WaferMonitorApp;
use eframe::egui;
use wafer_monitor::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional file to open at start-up.
    let mut state = AppState::default();
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        if let Err(e) = state.open_path(&path) {
            log::error!("Failed to open {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wafer Monitor",
        options,
        Box::new(|_cc| Ok(Box::new(WaferMonitorApp::new(state)))),
    )
}
