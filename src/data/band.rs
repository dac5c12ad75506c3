use super::model::MeasurementTable;

/// Number of leading samples averaged into the baseline.
pub const BASELINE_WINDOW: usize = 5;

pub const INNER_UPPER_FACTOR: f64 = 1.0075;
pub const INNER_LOWER_FACTOR: f64 = 0.9925;
pub const OUTER_UPPER_FACTOR: f64 = 1.015;
pub const OUTER_LOWER_FACTOR: f64 = 0.985;

/// Drift reference lines around the baseline of a channel: ±0.75 % inner
/// and ±1.5 % outer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlBand {
    pub baseline: f64,
    pub inner_upper: f64,
    pub inner_lower: f64,
    pub outer_upper: f64,
    pub outer_lower: f64,
}

impl ControlBand {
    /// Scale the fixed offsets from `baseline`. `None` for a zero or NaN
    /// baseline, where no band is drawn.
    pub fn from_baseline(baseline: f64) -> Option<Self> {
        if baseline.is_nan() || baseline == 0.0 {
            return None;
        }
        Some(Self {
            baseline,
            inner_upper: baseline * INNER_UPPER_FACTOR,
            inner_lower: baseline * INNER_LOWER_FACTOR,
            outer_upper: baseline * OUTER_UPPER_FACTOR,
            outer_lower: baseline * OUTER_LOWER_FACTOR,
        })
    }

    /// The four horizontal lines to draw, inner pair first.
    pub fn limits(&self) -> [f64; 4] {
        [
            self.inner_upper,
            self.inner_lower,
            self.outer_upper,
            self.outer_lower,
        ]
    }
}

/// Band from the mean of the first `window` values (missing ones skipped).
/// A short series uses whatever it has.
pub fn band_from_values(values: &[f64], window: usize) -> Option<ControlBand> {
    let (sum, n) = values
        .iter()
        .take(window)
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return None;
    }
    ControlBand::from_baseline(sum / n as f64)
}

/// Band for a named channel of `table`, in row order.
pub fn derive_band(table: &MeasurementTable, channel: &str, window: usize) -> Option<ControlBand> {
    band_from_values(table.column(channel)?, window)
}
