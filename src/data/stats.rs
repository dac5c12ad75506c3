//! Per-channel dispersion statistics.
//!
//! Missing samples (NaN) are excluded from every statistic. A zero or
//! undefined mean yields NaN relative metrics instead of an error, so a
//! dead channel shows up as `nan` in the summary table.

use std::io::Write;

use super::model::MeasurementTable;

/// Summary of one channel over the whole table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    /// Number of non-missing samples.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (N-1). NaN with fewer than two samples.
    pub sigma: f64,
    pub min: f64,
    pub max: f64,
    /// `sigma / mean`.
    pub relative_one_sigma: f64,
    /// `(max - min) / mean`.
    pub relative_peak_to_peak: f64,
}

impl ChannelStats {
    /// Compute statistics for one column, ignoring NaN entries.
    pub fn from_values(values: &[f64]) -> Self {
        let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = present.len();

        let mean = if count == 0 {
            f64::NAN
        } else {
            present.iter().sum::<f64>() / count as f64
        };

        let sigma = if count < 2 {
            f64::NAN
        } else {
            let ss: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        };

        let (min, max) = if count == 0 {
            (f64::NAN, f64::NAN)
        } else {
            present
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };

        Self {
            count,
            mean,
            sigma,
            min,
            max,
            relative_one_sigma: relative(sigma, mean),
            relative_peak_to_peak: relative(max - min, mean),
        }
    }
}

/// `value / mean`, or NaN when the mean is exactly zero.
fn relative(value: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        f64::NAN
    } else {
        value / mean
    }
}

// ---------------------------------------------------------------------------
// StatsTable
// ---------------------------------------------------------------------------

/// Statistics for every channel of a [`MeasurementTable`], in column order.
#[derive(Debug, Clone, Default)]
pub struct StatsTable {
    entries: Vec<(String, ChannelStats)>,
}

impl StatsTable {
    /// Row labels used when the table is presented with channels as columns.
    pub const ROW_LABELS: [&'static str; 2] = ["1sigma", "Peak to Peak"];

    pub fn get(&self, channel: &str) -> Option<&ChannelStats> {
        self.entries
            .iter()
            .find(|(name, _)| name == channel)
            .map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelStats)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The two presented rows, each aligned with [`channel_names`](Self::channel_names).
    pub fn rows(&self) -> [(&'static str, Vec<f64>); 2] {
        [
            (
                Self::ROW_LABELS[0],
                self.entries.iter().map(|(_, s)| s.relative_one_sigma).collect(),
            ),
            (
                Self::ROW_LABELS[1],
                self.entries
                    .iter()
                    .map(|(_, s)| s.relative_peak_to_peak)
                    .collect(),
            ),
        ]
    }

    /// Write the presented table as CSV: a header of channel names, then one
    /// line per row label.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec![String::new()];
        header.extend(self.channel_names().map(str::to_string));
        wtr.write_record(&header)?;

        for (label, values) in self.rows() {
            let mut record = vec![label.to_string()];
            record.extend(values.into_iter().map(format_stat));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Compute statistics for every channel of the table.
pub fn compute_stats(table: &MeasurementTable) -> StatsTable {
    StatsTable {
        entries: table
            .iter_columns()
            .map(|(name, values)| (name.to_string(), ChannelStats::from_values(values)))
            .collect(),
    }
}

/// Fixed four-decimal presentation; NaN renders as `nan`.
pub fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else {
        format!("{v:.4}")
    }
}
