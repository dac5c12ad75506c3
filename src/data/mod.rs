/// Data layer: core types, loading, statistics and chart models.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  whole file → RawSheet for one named sheet
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  table    │  RawSheet → MeasurementTable (timestamp + 18 channels)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  band     │  baseline control limits per channel
///   └──────────┘   └──────────┘
///        │              │
///        ▼              ▼
///   StatsTable      panel (per-group charts)
/// ```
///
/// `cache` memoises loader → table → stats per (upload, sheet).

pub mod band;
pub mod cache;
pub mod error;
pub mod loader;
pub mod model;
pub mod panel;
pub mod stats;
pub mod table;
