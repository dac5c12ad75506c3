use thiserror::Error;

/// Failures that abort loading a (file, sheet) selection.
///
/// Row numbers are 1-based, as a spreadsheet user would count them.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("row {row}: expected 20 columns (date, time, 18 values), found {width}")]
    Structural { row: usize, width: usize },

    #[error("row {row}: '{text}' does not match the DD-MM-YYYY HH:MM:SS timestamp format")]
    Parse { row: usize, text: String },

    #[error("sheet '{sheet}' not found in file")]
    SheetNotFound { sheet: String },

    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("reading workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
