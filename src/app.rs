use eframe::egui;

use wafer_monitor::state::AppState;
use wafer_monitor::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct WaferMonitorApp {
    pub state: AppState,
}

impl WaferMonitorApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for WaferMonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sheet / point selection ----
        egui::SidePanel::left("selection_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Statistics strip ----
        if let Some(loaded) = self.state.loaded.clone() {
            egui::TopBottomPanel::top("stats_panel")
                .resizable(false)
                .show(ctx, |ui| {
                    panels::stats_table(ui, &loaded.stats);
                });
        }

        // ---- Central panel: trend charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::trend_plots(ui, &self.state);
        });
    }
}
