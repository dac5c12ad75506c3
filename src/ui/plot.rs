use chrono::DateTime;
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{GridMark, HLine, Legend, Line, LineStyle, Plot, PlotPoints, Points};

use crate::color::{group_colors, BAND_COLOR};
use crate::data::panel::{ChartPanel, PanelContent};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trend charts (central panel)
// ---------------------------------------------------------------------------

/// Render one chart per group, side by side.
pub fn trend_plots(ui: &mut Ui, state: &AppState) {
    if state.upload.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a measurement file to view trends  (File → Open…)");
        });
        return;
    }

    let panels = state.panels();
    if panels.is_empty() {
        return;
    }

    let colors = group_colors();
    ui.columns(panels.len(), |cols| {
        for (idx, (col, panel)) in cols.iter_mut().zip(&panels).enumerate() {
            match panel {
                PanelContent::Chart(chart) => trend_plot(col, idx, chart, colors[idx]),
                PanelContent::Missing { .. } => {
                    if let Some(msg) = panel.warning() {
                        col.label(RichText::new(msg).color(Color32::YELLOW));
                    }
                }
            }
        }
    });
}

fn trend_plot(ui: &mut Ui, idx: usize, chart: &ChartPanel, color: Color32) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&chart.title);
    });

    let xy: Vec<[f64; 2]> = chart
        .points
        .iter()
        .map(|(t, v)| [t.and_utc().timestamp() as f64, *v])
        .collect();

    Plot::new(("trend_plot", idx))
        .legend(Legend::default())
        .y_axis_label("Signal:cts/s")
        .x_axis_formatter(format_time_mark)
        .label_formatter(|name, value| {
            format!("{name}\n{}\n{:.4}", format_seconds(value.x), value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(xy.clone()))
                    .name(&chart.column)
                    .color(color)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(xy))
                    .name(&chart.column)
                    .color(color)
                    .radius(3.0),
            );

            if let Some(band) = &chart.band {
                for y in band.limits() {
                    plot_ui.hline(
                        HLine::new(y)
                            .color(BAND_COLOR)
                            .style(LineStyle::dashed_loose()),
                    );
                }
            }
        });
}

fn format_time_mark(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    format_seconds(mark.value)
}

/// Unix seconds → `MM-DD HH:MM`.
fn format_seconds(secs: f64) -> String {
    DateTime::from_timestamp(secs.round() as i64, 0)
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        // 2024-01-05 06:30:00 UTC
        assert_eq!(format_seconds(1_704_436_200.0), "01-05 06:30");
    }
}
