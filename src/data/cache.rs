use std::collections::HashMap;
use std::sync::Arc;

use super::loader::{LoadedSheet, UploadId};

// ---------------------------------------------------------------------------
// Memoised (upload, sheet) → LoadedSheet
// ---------------------------------------------------------------------------

/// Results of previous sheet loads, keyed by upload identity and sheet name.
/// Failed loads are never stored, so a retry re-runs the loader.
#[derive(Debug, Default)]
pub struct SheetCache {
    entries: HashMap<(UploadId, String), Arc<LoadedSheet>>,
    hits: u64,
    misses: u64,
}

impl SheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached entry or run `load` and remember its success.
    pub fn get_or_load<E>(
        &mut self,
        upload: UploadId,
        sheet: &str,
        load: impl FnOnce() -> Result<LoadedSheet, E>,
    ) -> Result<Arc<LoadedSheet>, E> {
        let key = (upload, sheet.to_string());
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            log::debug!("sheet cache hit for '{sheet}'");
            return Ok(Arc::clone(hit));
        }

        self.misses += 1;
        log::debug!("sheet cache miss for '{sheet}'");
        let loaded = Arc::new(load()?);
        self.entries.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drop every entry that does not belong to `upload`.
    pub fn retain_upload(&mut self, upload: UploadId) {
        let before = self.entries.len();
        self.entries.retain(|(id, _), _| *id == upload);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            log::info!("Evicted {evicted} cached sheet(s) from previous uploads");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::Upload;
    use crate::data::model::ChannelLayout;
    use crate::data::stats::compute_stats;
    use crate::data::table::{build, tests::row};

    fn loaded(sheet: &str) -> LoadedSheet {
        let table = build(&vec![row("01-01-2024", "00:00:00", 1.0)], &ChannelLayout::WAFER).unwrap();
        let stats = compute_stats(&table);
        LoadedSheet {
            sheet: sheet.to_string(),
            table,
            stats,
        }
    }

    #[test]
    fn test_second_lookup_is_a_hit() {
        let id = Upload::new("a.xlsx", vec![1, 2, 3]).id;
        let mut cache = SheetCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let entry = cache
                .get_or_load(id, "I0", || -> Result<_, ()> {
                    calls += 1;
                    Ok(loaded("I0"))
                })
                .unwrap();
            assert_eq!(entry.sheet, "I0");
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 2);
    }

    #[test]
    fn test_sheets_are_cached_separately() {
        let id = Upload::new("a.xlsx", vec![1]).id;
        let mut cache = SheetCache::new();
        cache.get_or_load(id, "I0", || Ok::<_, ()>(loaded("I0"))).unwrap();
        cache.get_or_load(id, "If", || Ok::<_, ()>(loaded("If"))).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let id = Upload::new("a.xlsx", vec![1]).id;
        let mut cache = SheetCache::new();
        assert!(cache.get_or_load(id, "I0", || Err("boom")).is_err());
        assert!(cache.is_empty());
        assert!(cache.get_or_load(id, "I0", || Ok::<_, &str>(loaded("I0"))).is_ok());
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_retain_upload_evicts_others() {
        let old = Upload::new("a.xlsx", vec![1]).id;
        let new = Upload::new("b.xlsx", vec![2]).id;
        let mut cache = SheetCache::new();
        cache.get_or_load(old, "I0", || Ok::<_, ()>(loaded("I0"))).unwrap();
        cache.get_or_load(new, "I0", || Ok::<_, ()>(loaded("I0"))).unwrap();

        cache.retain_upload(new);
        assert_eq!(cache.len(), 1);

        let mut reloaded = false;
        cache
            .get_or_load(old, "I0", || {
                reloaded = true;
                Ok::<_, ()>(loaded("I0"))
            })
            .unwrap();
        assert!(reloaded);
    }
}
