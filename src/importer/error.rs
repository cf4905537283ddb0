// ==========================================
// Wood QC Report - Import error types
// ==========================================
// Scope: reading record sets from files. The computation core itself
// never fails; only the record-source adapters return these.
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.csv/.json)")]
    UnsupportedFormat(String),

    #[error("failed to read file: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("JSON record parse failed: {0}")]
    JsonParseError(String),

    // ===== Selection errors =====
    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("no data rows in {0}")]
    NoRecords(String),

    #[error("sample not found: {0}")]
    SampleNotFound(String),

    #[error("row {row} out of range (file has {available} data rows)")]
    RowOutOfRange { row: usize, available: usize },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result alias for the import layer.
pub type ImportResult<T> = Result<T, ImportError>;
