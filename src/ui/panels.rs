use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{GROUP_LABELS, POSITION_LABELS, SHEET_NAMES};
use crate::data::stats::{format_stat, StatsTable};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – sheet and point selectors
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    if state.upload.is_none() {
        ui.label("No file loaded.");
        return;
    }

    ui.strong("Sheet");
    let current_sheet = state.sheet.clone();
    egui::ComboBox::from_id_salt("sheet")
        .selected_text(&current_sheet)
        .show_ui(ui, |ui: &mut Ui| {
            for sheet in SHEET_NAMES {
                if ui.selectable_label(current_sheet == sheet, sheet).clicked() {
                    state.select_sheet(sheet);
                }
            }
        });
    ui.separator();

    // ---- One position selector per group ----
    let selection = state.selection();
    for (group, label) in GROUP_LABELS.iter().enumerate() {
        ui.strong(format!("{label} point"));
        let current = selection.position(group);
        egui::ComboBox::from_id_salt(("point", group, &current_sheet))
            .selected_text(POSITION_LABELS[current])
            .show_ui(ui, |ui: &mut Ui| {
                for (position, name) in POSITION_LABELS.iter().enumerate() {
                    if ui.selectable_label(current == position, *name).clicked() {
                        state.select_point(group, position);
                    }
                }
            });
        ui.add_space(4.0);
    }
}

// ---------------------------------------------------------------------------
// Statistics table
// ---------------------------------------------------------------------------

/// Channels as columns, "1sigma" / "Peak to Peak" as rows.
pub fn stats_table(ui: &mut Ui, stats: &StatsTable) {
    ui.strong("Statistics");
    egui::ScrollArea::horizontal()
        .id_salt("stats_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto().at_least(90.0))
                .columns(Column::auto().at_least(70.0), stats.len())
                .header(20.0, |mut header| {
                    header.col(|_ui| {});
                    for name in stats.channel_names() {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for (label, values) in stats.rows() {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.strong(label);
                            });
                            for v in values {
                                row.col(|ui| {
                                    ui.monospace(format_stat(v));
                                });
                            }
                        });
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.loaded.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export statistics…"))
                .clicked()
            {
                export_stats_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(upload), Some(loaded)) = (&state.upload, &state.loaded) {
            ui.label(format!(
                "{} – sheet {}: {} rows",
                upload.name,
                loaded.sheet,
                loaded.table.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open wafer measurements")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "csv"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("CSV (one sheet per file)", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_path(&path) {
            log::error!("Failed to open file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn export_stats_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export statistics")
        .set_file_name(format!("stats_{}.csv", state.sheet))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_stats(&path) {
            log::error!("Failed to export statistics: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
