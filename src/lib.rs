//! Wafer measurement viewer.
//!
//! Loads a measurement sheet, summarises every channel and derives the
//! baseline control bands drawn on the per-group trend charts.
//!
//! - [`data`] – loading, table shaping, statistics, control bands, cache
//! - [`state`] – UI-independent application state
//! - [`ui`] / [`color`] – egui rendering

pub mod color;
pub mod data;
pub mod state;
pub mod ui;
