use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::data::cache::SheetCache;
use crate::data::loader::{load_sheet, LoadedSheet, Upload};
use crate::data::model::{ChannelLayout, SHEET_NAMES};
use crate::data::panel::{build_panels, PanelContent, PointSelection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// File currently opened (None until the user picks one).
    pub upload: Option<Upload>,

    /// Sheet selected in the side panel.
    pub sheet: String,

    /// Per-sheet point selection; each sheet remembers its own.
    pub selections: BTreeMap<String, PointSelection>,

    /// Result for the active (file, sheet), if it loaded.
    pub loaded: Option<Arc<LoadedSheet>>,

    /// Memoised loads for the current upload.
    pub cache: SheetCache,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            upload: None,
            sheet: SHEET_NAMES[0].to_string(),
            selections: BTreeMap::new(),
            loaded: None,
            cache: SheetCache::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Read a file from disk and make it the active upload.
    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        let upload =
            Upload::from_path(path).with_context(|| format!("reading {}", path.display()))?;
        log::info!("Opened {} ({} bytes)", upload.name, upload.bytes.len());
        self.set_upload(upload);
        Ok(())
    }

    /// Replace the active upload; cached sheets of older uploads are dropped.
    pub fn set_upload(&mut self, upload: Upload) {
        self.cache.retain_upload(upload.id);
        self.upload = Some(upload);
        self.reload();
    }

    /// Switch to another sheet of the current upload.
    pub fn select_sheet(&mut self, sheet: &str) {
        if self.sheet != sheet {
            self.sheet = sheet.to_string();
            self.reload();
        }
    }

    /// Point selection for the active sheet.
    pub fn selection(&self) -> PointSelection {
        self.selections
            .get(&self.sheet)
            .copied()
            .unwrap_or_default()
    }

    pub fn select_point(&mut self, group: usize, position: usize) {
        self.selections
            .entry(self.sheet.clone())
            .or_default()
            .set(group, position);
    }

    /// Load (or fetch from cache) the active (file, sheet). A failure clears
    /// the previous result so nothing stale is shown.
    pub fn reload(&mut self) {
        let Some(upload) = &self.upload else {
            return;
        };
        match self
            .cache
            .get_or_load(upload.id, &self.sheet, || load_sheet(upload, &self.sheet))
        {
            Ok(loaded) => {
                self.loaded = Some(loaded);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load sheet '{}' of {}: {e}", self.sheet, upload.name);
                self.status_message = Some(format!("Error: {e}"));
                self.loaded = None;
            }
        }
    }

    /// Chart panels for the active selection, empty when nothing is loaded.
    pub fn panels(&self) -> Vec<PanelContent> {
        match &self.loaded {
            Some(loaded) => build_panels(
                &loaded.table,
                &ChannelLayout::WAFER,
                &self.selection(),
                &loaded.sheet,
            ),
            None => Vec::new(),
        }
    }

    /// Write the statistics of the active sheet as CSV.
    pub fn export_stats(&self, path: &Path) -> Result<()> {
        let loaded = self.loaded.as_ref().context("no sheet loaded")?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        loaded
            .stats
            .write_csv(file)
            .context("writing statistics CSV")?;
        log::info!("Exported statistics for '{}' to {}", loaded.sheet, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CHANNEL_COUNT;

    fn csv_sheet(name: &str, bad_date: bool) -> Upload {
        let lines: Vec<String> = (0..6)
            .map(|h| {
                let date = if bad_date && h == 3 { "2024-01-05" } else { "05-01-2024" };
                let mut fields = vec![date.to_string(), format!("0{h}:00:00")];
                fields.extend((0..CHANNEL_COUNT).map(|i| format!("{}", 100 + i)));
                fields.join(",")
            })
            .collect();
        Upload::new(format!("{name}.csv"), lines.join("\n").into_bytes())
    }

    #[test]
    fn test_set_upload_loads_active_sheet() {
        let mut state = AppState::default();
        state.set_upload(csv_sheet("I0", false));

        let loaded = state.loaded.as_ref().expect("sheet should load");
        assert_eq!(loaded.sheet, "I0");
        assert_eq!(loaded.table.len(), 6);
        assert!(state.status_message.is_none());
        assert_eq!(state.panels().len(), 3);
    }

    #[test]
    fn test_missing_sheet_reports_error() {
        let mut state = AppState::default();
        state.set_upload(csv_sheet("I0", false));
        state.select_sheet("If");

        assert!(state.loaded.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("'If'"), "{msg}");
        assert!(state.panels().is_empty());
    }

    #[test]
    fn test_parse_error_blocks_stats() {
        let mut state = AppState::default();
        state.set_upload(csv_sheet("I0", true));
        assert!(state.loaded.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("row 4"));
    }

    #[test]
    fn test_selection_is_per_sheet() {
        let mut state = AppState::default();
        state.select_point(0, 3);
        assert_eq!(state.selection().position(0), 3);

        state.select_sheet("Iave");
        assert_eq!(state.selection(), PointSelection::default());

        state.select_sheet("I0");
        assert_eq!(state.selection().position(0), 3);
    }

    #[test]
    fn test_reselecting_sheet_hits_cache() {
        let mut state = AppState::default();
        state.set_upload(csv_sheet("I0", false));
        state.select_sheet("If");
        state.select_sheet("I0");

        assert_eq!(state.cache.len(), 1);
        assert_eq!(state.cache.hits(), 1);
        assert!(state.loaded.is_some());
    }

    #[test]
    fn test_new_upload_evicts_old_entries() {
        let mut state = AppState::default();
        state.set_upload(csv_sheet("I0", false));
        let mut other = csv_sheet("I0", false);
        other.bytes.push(b'\n');
        state.set_upload(Upload::new(other.name, other.bytes));

        assert_eq!(state.cache.len(), 1);
        assert_eq!(state.cache.misses(), 2);
    }
}
