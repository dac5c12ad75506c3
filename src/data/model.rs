use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Fixed layout constants
// ---------------------------------------------------------------------------

/// Material groups, in column order.
pub const GROUP_LABELS: [&str; GROUP_COUNT] = ["TOX", "HfO2", "Al2O3"];

/// Measurement positions on the wafer: left, bottom, center, top, right, average.
pub const POSITION_LABELS: [&str; POSITION_COUNT] = ["L", "B", "C", "T", "R", "Ave"];

/// Sheet names recognised in an uploaded workbook.
pub const SHEET_NAMES: [&str; 3] = ["I0", "If", "Iave"];

/// Pattern for the `date + " " + time` cell pair.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

pub const GROUP_COUNT: usize = 3;
pub const POSITION_COUNT: usize = 6;
pub const CHANNEL_COUNT: usize = GROUP_COUNT * POSITION_COUNT;

/// Date, time, then one cell per channel.
pub const ROW_WIDTH: usize = 2 + CHANNEL_COUNT;

// ---------------------------------------------------------------------------
// Cell / RawSheet – untyped input rows
// ---------------------------------------------------------------------------

/// A single untyped spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Coerce to a measurement value. Anything non-numeric becomes NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            Cell::Empty => f64::NAN,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s.trim()),
            Cell::Number(v) => write!(f, "{v}"),
        }
    }
}

/// Rows of one sheet, exactly as read. No header row.
pub type RawSheet = Vec<Vec<Cell>>;

// ---------------------------------------------------------------------------
// ChannelId / ChannelLayout
// ---------------------------------------------------------------------------

/// One measurement channel: a (group, position) pair, both as indices into
/// the layout's label arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId {
    pub group: usize,
    pub position: usize,
}

impl ChannelId {
    pub fn new(group: usize, position: usize) -> Self {
        debug_assert!(group < GROUP_COUNT && position < POSITION_COUNT);
        Self { group, position }
    }

    /// Group-major, position-minor.
    pub fn from_index(i: usize) -> Self {
        Self::new(i / POSITION_COUNT, i % POSITION_COUNT)
    }

    pub fn index(&self) -> usize {
        self.group * POSITION_COUNT + self.position
    }

    /// All 18 channels in column order.
    pub fn all() -> impl Iterator<Item = ChannelId> {
        (0..CHANNEL_COUNT).map(ChannelId::from_index)
    }
}

/// Labels used to synthesise channel column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub groups: [&'static str; GROUP_COUNT],
    pub positions: [&'static str; POSITION_COUNT],
}

impl ChannelLayout {
    /// The production wafer layout.
    pub const WAFER: ChannelLayout = ChannelLayout {
        groups: GROUP_LABELS,
        positions: POSITION_LABELS,
    };

    /// `"{group}_{position}"`, e.g. `TOX_L`.
    pub fn channel_name(&self, id: ChannelId) -> String {
        format!("{}_{}", self.groups[id.group], self.positions[id.position])
    }

    /// Column names for all channels, in cell order.
    pub fn channel_names(&self) -> Vec<String> {
        ChannelId::all().map(|id| self.channel_name(id)).collect()
    }

    /// Inverse of [`channel_name`](Self::channel_name).
    pub fn parse_channel(&self, name: &str) -> Option<ChannelId> {
        ChannelId::all().find(|id| self.channel_name(*id) == name)
    }
}

impl Default for ChannelLayout {
    fn default() -> Self {
        Self::WAFER
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – the typed time-series
// ---------------------------------------------------------------------------

/// One row per input row: a timestamp plus one value per channel.
/// Missing measurements are NaN.
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    timestamps: Vec<NaiveDateTime>,
    channel_names: Vec<String>,
    /// Column-major: `columns[c][row]`.
    columns: Vec<Vec<f64>>,
}

impl MeasurementTable {
    pub(crate) fn from_parts(
        timestamps: Vec<NaiveDateTime>,
        channel_names: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(channel_names.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == timestamps.len()));
        Self {
            timestamps,
            channel_names,
            columns,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    /// Values of a named channel, or `None` if no such column exists.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.channel_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate `(name, values)` in column order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.channel_names
            .iter()
            .zip(self.columns.iter())
            .map(|(n, c)| (n.as_str(), c.as_slice()))
    }

    /// `(timestamp, value)` pairs for plotting, skipping missing samples.
    pub fn series(&self, name: &str) -> Option<Vec<(NaiveDateTime, f64)>> {
        let values = self.column(name)?;
        Some(
            self.timestamps
                .iter()
                .zip(values.iter())
                .filter(|(_, v)| !v.is_nan())
                .map(|(t, v)| (*t, *v))
                .collect(),
        )
    }
}
