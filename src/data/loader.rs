use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};

use super::error::LoadError;
use super::model::{Cell, ChannelLayout, MeasurementTable, RawSheet};
use super::stats::{compute_stats, StatsTable};
use super::table;

// ---------------------------------------------------------------------------
// Upload – a whole file held in memory
// ---------------------------------------------------------------------------

/// Identity of an uploaded file: name plus content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(u64);

impl UploadId {
    pub fn of(name: &str, bytes: &[u8]) -> Self {
        let mut h = DefaultHasher::new();
        name.hash(&mut h);
        bytes.hash(&mut h);
        UploadId(h.finish())
    }
}

/// A file read once, whole, into memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub id: UploadId,
    /// File name including extension.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        Self {
            id: UploadId::of(&name, &bytes),
            name,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
    }

    fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Everything derived from one (file, sheet) selection.
#[derive(Debug)]
pub struct LoadedSheet {
    pub sheet: String,
    pub table: MeasurementTable,
    pub stats: StatsTable,
}

/// Read, shape and summarise one sheet. Any structural or timestamp error
/// aborts the whole load.
pub fn load_sheet(upload: &Upload, sheet: &str) -> Result<LoadedSheet, LoadError> {
    let raw = read_sheet(upload, sheet)?;
    let table = table::build(&raw, &ChannelLayout::WAFER)?;
    let stats = compute_stats(&table);
    log::info!(
        "Loaded sheet '{sheet}' of {}: {} rows",
        upload.name,
        table.len()
    );
    Ok(LoadedSheet {
        sheet: sheet.to_string(),
        table,
        stats,
    })
}

/// Extract the raw rows of `sheet`. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – workbook, sheet selected by name
/// * `.csv` – a single sheet named after the file stem, no header row
pub fn read_sheet(upload: &Upload, sheet: &str) -> Result<RawSheet, LoadError> {
    match upload.extension().as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook_sheet(&upload.bytes, sheet),
        "csv" => {
            if upload.stem() != sheet {
                return Err(LoadError::SheetNotFound {
                    sheet: sheet.to_string(),
                });
            }
            read_csv(&upload.bytes)
        }
        other => Err(LoadError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn read_workbook_sheet(bytes: &[u8], sheet: &str) -> Result<RawSheet, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    if !workbook.sheet_names().iter().any(|n| n == sheet) {
        return Err(LoadError::SheetNotFound {
            sheet: sheet.to_string(),
        });
    }
    let range = workbook.worksheet_range(sheet)?;

    Ok(range
        .rows()
        .map(|r| r.iter().map(data_to_cell).collect::<Vec<_>>())
        .filter(|r| !is_blank(r))
        .collect())
}

/// Convert a workbook cell the way a spreadsheet reader stringifies it.
///
/// Date-time serials render as `HH:MM:SS` when they carry only a time of day
/// and as `YYYY-MM-DD HH:MM:SS` otherwise.
fn data_to_cell(d: &Data) -> Cell {
    match d {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => serial_to_text(dt.as_f64()).map_or(Cell::Empty, Cell::Text),
    }
}

fn serial_to_text(serial: f64) -> Option<String> {
    let millis = (serial * 86_400_000.0).round() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let dt = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    if (0.0..1.0).contains(&serial) {
        Some(dt.format("%H:%M:%S").to_string())
    } else {
        Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

fn is_blank(row: &[Cell]) -> bool {
    row.iter().all(|c| match c {
        Cell::Text(s) => s.trim().is_empty(),
        other => other.is_empty(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: no header row, one measurement row per line.
/// Rows keep their own width so malformed lines surface as structural errors.
fn read_csv(bytes: &[u8]) -> Result<RawSheet, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record.iter().map(guess_cell).collect();
        if !is_blank(&row) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn guess_cell(s: &str) -> Cell {
    let s = s.trim();
    if s.is_empty() {
        return Cell::Empty;
    }
    match s.parse::<f64>() {
        Ok(v) => Cell::Number(v),
        Err(_) => Cell::Text(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CHANNEL_COUNT, ROW_WIDTH};
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    fn csv_line(date: &str, time: &str, value: f64) -> String {
        let mut fields = vec![date.to_string(), time.to_string()];
        fields.extend((0..CHANNEL_COUNT).map(|i| format!("{}", value + i as f64)));
        fields.join(",")
    }

    #[test]
    fn test_upload_id_tracks_content() {
        let a = Upload::new("a.csv", b"1,2".to_vec());
        let b = Upload::new("a.csv", b"1,2".to_vec());
        let c = Upload::new("a.csv", b"1,3".to_vec());
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_read_csv_sheet() {
        let text = format!(
            "{}\n\n{}\n",
            csv_line("01-02-2024", "08:00:00", 1.0),
            csv_line("01-02-2024", "09:00:00", 2.0)
        );
        let upload = Upload::new("I0.csv", text.into_bytes());
        let raw = read_sheet(&upload, "I0").unwrap();

        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].len(), ROW_WIDTH);
        assert_eq!(raw[0][0], Cell::Text("01-02-2024".into()));
        assert_eq!(raw[1][2], Cell::Number(2.0));
    }

    #[test]
    fn test_csv_sheet_name_is_stem() {
        let upload = Upload::new("I0.csv", csv_line("01-02-2024", "08:00:00", 1.0).into_bytes());
        assert!(matches!(
            read_sheet(&upload, "If"),
            Err(LoadError::SheetNotFound { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let upload = Upload::new("I0.parquet", Vec::new());
        match read_sheet(&upload, "I0") {
            Err(LoadError::UnsupportedFormat { extension }) => assert_eq!(extension, "parquet"),
            other => panic!("expected unsupported format, got {other:?}"),
        }
    }

    #[test]
    fn test_load_sheet_end_to_end() {
        let lines: Vec<String> = (0..6)
            .map(|h| {
                let v = if h == 5 { 101.0 } else { 100.0 };
                csv_line("05-01-2024", &format!("1{h}:00:00"), v)
            })
            .collect();
        let upload = Upload::new("Iave.csv", lines.join("\n").into_bytes());

        let loaded = load_sheet(&upload, "Iave").unwrap();
        assert_eq!(loaded.sheet, "Iave");
        assert_eq!(loaded.table.len(), 6);
        let tox_l = loaded.stats.get("TOX_L").unwrap();
        assert!((tox_l.relative_one_sigma - 0.004_075_7).abs() < 1e-6);
    }

    #[test]
    fn test_load_sheet_short_row() {
        let text = format!("{}\n01-02-2024,09:00:00,1,2,3\n", csv_line("01-02-2024", "08:00:00", 1.0));
        let upload = Upload::new("I0.csv", text.into_bytes());
        assert!(matches!(
            load_sheet(&upload, "I0"),
            Err(LoadError::Structural { row: 2, width: 5 })
        ));
    }

    #[test]
    fn test_load_sheet_bad_date() {
        let text = format!(
            "{}\n{}\n",
            csv_line("01-02-2024", "08:00:00", 1.0),
            csv_line("2024-02-01", "09:00:00", 1.0)
        );
        let upload = Upload::new("I0.csv", text.into_bytes());
        assert!(matches!(
            load_sheet(&upload, "I0"),
            Err(LoadError::Parse { row: 2, .. })
        ));
    }

    #[test]
    fn test_workbook_cell_conversion() {
        assert_eq!(data_to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(data_to_cell(&Data::Error(CellErrorType::NA)), Cell::Empty);
        assert_eq!(data_to_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(data_to_cell(&Data::Float(1.25)), Cell::Number(1.25));
        assert_eq!(
            data_to_cell(&Data::String("05-01-2024".into())),
            Cell::Text("05-01-2024".into())
        );

        // 0.5 day = noon, time-only serial.
        let noon = ExcelDateTime::new(0.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(data_to_cell(&Data::DateTime(noon)), Cell::Text("12:00:00".into()));

        // 45296.25 = 2024-01-05 06:00:00.
        let full = ExcelDateTime::new(45296.25, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            data_to_cell(&Data::DateTime(full)),
            Cell::Text("2024-01-05 06:00:00".into())
        );
    }

    #[test]
    fn test_serial_time_rounds_to_second() {
        // 10:30:15 as a day fraction carries float error.
        let serial = (10.0 * 3600.0 + 30.0 * 60.0 + 15.0) / 86_400.0;
        assert_eq!(serial_to_text(serial).as_deref(), Some("10:30:15"));
    }

    #[test]
    fn test_blank_rows() {
        assert!(is_blank(&[Cell::Empty, Cell::Text("  ".into())]));
        assert!(!is_blank(&[Cell::Empty, Cell::Number(0.0)]));
    }
}
