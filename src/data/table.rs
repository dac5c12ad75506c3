use chrono::NaiveDateTime;

use super::error::LoadError;
use super::model::{
    Cell, ChannelLayout, MeasurementTable, RawSheet, CHANNEL_COUNT, ROW_WIDTH, TIMESTAMP_FORMAT,
};

// ---------------------------------------------------------------------------
// RawSheet → MeasurementTable
// ---------------------------------------------------------------------------

/// Build a typed measurement table from the rows of one sheet.
///
/// Row layout: `date, time, v0 .. v17`, where `v{i}` belongs to channel
/// `groups[i / 6] + "_" + positions[i % 6]`.
///
/// The load is all-or-nothing: every row is width-checked first, then every
/// timestamp must parse. A single bad row fails the whole sheet.
/// Non-numeric measurement cells become NaN.
pub fn build(raw: &RawSheet, layout: &ChannelLayout) -> Result<MeasurementTable, LoadError> {
    for (i, row) in raw.iter().enumerate() {
        if row.len() != ROW_WIDTH {
            return Err(LoadError::Structural {
                row: i + 1,
                width: row.len(),
            });
        }
    }

    let timestamps = raw
        .iter()
        .enumerate()
        .map(|(i, row)| parse_timestamp(&row[0], &row[1], i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns: Vec<Vec<f64>> = (0..CHANNEL_COUNT)
        .map(|_| Vec::with_capacity(raw.len()))
        .collect();
    for row in raw {
        for (col, cell) in columns.iter_mut().zip(&row[2..]) {
            col.push(cell.as_f64());
        }
    }

    Ok(MeasurementTable::from_parts(
        timestamps,
        layout.channel_names(),
        columns,
    ))
}

fn parse_timestamp(date: &Cell, time: &Cell, row: usize) -> Result<NaiveDateTime, LoadError> {
    let text = format!("{date} {time}");
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
        .map_err(|_| LoadError::Parse { row, text })
}
