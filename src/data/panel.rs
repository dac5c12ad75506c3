use chrono::NaiveDateTime;

use super::band::{derive_band, ControlBand, BASELINE_WINDOW};
use super::model::{ChannelLayout, MeasurementTable, GROUP_COUNT, POSITION_COUNT};

// ---------------------------------------------------------------------------
// PointSelection – one position per group
// ---------------------------------------------------------------------------

/// The position shown for each group, chosen independently per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointSelection {
    positions: [usize; GROUP_COUNT],
}

impl Default for PointSelection {
    fn default() -> Self {
        Self {
            positions: [0; GROUP_COUNT],
        }
    }
}

impl PointSelection {
    pub fn position(&self, group: usize) -> usize {
        self.positions[group]
    }

    pub fn set(&mut self, group: usize, position: usize) {
        if group < GROUP_COUNT && position < POSITION_COUNT {
            self.positions[group] = position;
        }
    }
}

// ---------------------------------------------------------------------------
// Chart panels
// ---------------------------------------------------------------------------

/// Everything one chart needs: the series and its reference lines.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub title: String,
    /// Column name, also used as the legend entry.
    pub column: String,
    pub points: Vec<(NaiveDateTime, f64)>,
    pub band: Option<ControlBand>,
}

#[derive(Debug, Clone)]
pub enum PanelContent {
    Chart(ChartPanel),
    /// The selected column is not in the table; shown as a warning in place
    /// of the chart.
    Missing { column: String },
}

impl PanelContent {
    pub fn warning(&self) -> Option<String> {
        match self {
            PanelContent::Missing { column } => {
                Some(format!("Warning: column '{column}' does not exist in the data."))
            }
            PanelContent::Chart(_) => None,
        }
    }
}

/// One panel per group, left to right. A missing column only affects its
/// own panel.
pub fn build_panels(
    table: &MeasurementTable,
    layout: &ChannelLayout,
    selection: &PointSelection,
    sheet: &str,
) -> Vec<PanelContent> {
    (0..GROUP_COUNT)
        .map(|group| {
            let group_label = layout.groups[group];
            let position_label = layout.positions[selection.position(group)];
            let column = format!("{group_label}_{position_label}");

            match table.series(&column) {
                Some(points) => PanelContent::Chart(ChartPanel {
                    title: format!("{group_label} {position_label}_{sheet}"),
                    band: derive_band(table, &column, BASELINE_WINDOW),
                    column,
                    points,
                }),
                None => {
                    log::warn!("column '{column}' not found in sheet '{sheet}'");
                    PanelContent::Missing { column }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Cell, MeasurementTable};
    use crate::data::table::{build, tests::row};

    fn table() -> MeasurementTable {
        let raw: Vec<Vec<Cell>> = (0..6)
            .map(|h| row("05-01-2024", &format!("0{h}:00:00"), 100.0))
            .collect();
        build(&raw, &ChannelLayout::WAFER).unwrap()
    }

    #[test]
    fn test_default_selection_is_first_position() {
        let panels = build_panels(&table(), &ChannelLayout::WAFER, &PointSelection::default(), "I0");
        assert_eq!(panels.len(), GROUP_COUNT);
        match &panels[1] {
            PanelContent::Chart(c) => {
                assert_eq!(c.column, "HfO2_L");
                assert_eq!(c.title, "HfO2 L_I0");
                assert_eq!(c.points.len(), 6);
                let band = c.band.expect("positive baseline");
                assert!((band.baseline - 106.0).abs() < 1e-9);
            }
            other => panic!("expected chart, got {other:?}"),
        }
    }

    #[test]
    fn test_independent_positions() {
        let mut sel = PointSelection::default();
        sel.set(0, 5);
        sel.set(2, 2);
        let panels = build_panels(&table(), &ChannelLayout::WAFER, &sel, "If");
        let columns: Vec<String> = panels
            .iter()
            .map(|p| match p {
                PanelContent::Chart(c) => c.column.clone(),
                PanelContent::Missing { column } => column.clone(),
            })
            .collect();
        assert_eq!(columns, ["TOX_Ave", "HfO2_L", "Al2O3_C"]);
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        let mut sel = PointSelection::default();
        sel.set(0, POSITION_COUNT);
        sel.set(GROUP_COUNT, 1);
        assert_eq!(sel, PointSelection::default());
    }

    #[test]
    fn test_missing_column_is_local() {
        // A layout with a label the table was not built with.
        let layout = ChannelLayout {
            groups: ["TOX", "SiN", "Al2O3"],
            ..ChannelLayout::WAFER
        };
        let panels = build_panels(&table(), &layout, &PointSelection::default(), "I0");

        assert!(matches!(panels[0], PanelContent::Chart(_)));
        assert_eq!(
            panels[1].warning().as_deref(),
            Some("Warning: column 'SiN_L' does not exist in the data.")
        );
        assert!(matches!(panels[2], PanelContent::Chart(_)));
    }
}
