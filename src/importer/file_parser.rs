// ==========================================
// Wood QC Report - File parsers
// ==========================================
// Responsibility: laboratory sheets → ordered RawRecord rows
// Formats: Excel (.xlsx) / CSV (.csv, comma or semicolon) / JSON (.json)
// Blank rows are skipped; header order is preserved.
// ==========================================

use crate::domain::{RawRecord, RawValue};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Sheet holding the treated-wood register in the laboratory workbook.
pub const DEFAULT_SHEET: &str = "Madeira Tratada";

// ==========================================
// FileParser trait
// ==========================================
pub trait FileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// Semicolon when the header line uses it and has no commas (pt-BR exports).
    fn sniff_delimiter(text: &str) -> u8 {
        let header = text.lines().next().unwrap_or("");
        if header.contains(';') && !header.contains(',') {
            b';'
        } else {
            b','
        }
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        let path = file_path;
        ensure_exists(path)?;

        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let text = fs::read_to_string(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(Self::sniff_delimiter(&text))
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let record: RawRecord = headers
                .iter()
                .zip(row.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, value)| (header.clone(), RawValue::text(value.trim())))
                .collect();

            if record.is_blank() {
                continue;
            }
            records.push(record);
        }

        debug!(rows = records.len(), "CSV parsed");
        Ok(records)
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser {
    sheet: String,
}

impl ExcelParser {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }

    /// Excel serial day number → ISO date text (1900 date system).
    fn serial_to_iso(serial: f64) -> Option<String> {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        let date = epoch.checked_add_signed(Duration::days(serial.floor() as i64))?;
        Some(date.format("%Y-%m-%d").to_string())
    }

    fn cell_value(cell: &Data) -> RawValue {
        match cell {
            Data::Empty | Data::Error(_) => RawValue::Empty,
            Data::String(s) => RawValue::text(s.trim()),
            Data::Float(f) => RawValue::Number(*f),
            Data::Int(i) => RawValue::Number(*i as f64),
            Data::DateTime(dt) => match Self::serial_to_iso(dt.as_f64()) {
                Some(iso) => RawValue::Text(iso),
                None => RawValue::Number(dt.as_f64()),
            },
            other => RawValue::text(other.to_string()),
        }
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET)
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        let path = file_path;
        ensure_exists(path)?;

        let ext = extension_of(path);
        if ext != "xlsx" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = if sheet_names.iter().any(|name| *name == self.sheet) {
            self.sheet.clone()
        } else {
            let first = sheet_names.first().cloned().ok_or(ImportError::NoWorksheet)?;
            warn!(requested = %self.sheet, using = %first, "sheet not found, using first sheet");
            first
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::NoRecords(path.display().to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let record: RawRecord = headers
                .iter()
                .zip(data_row.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), Self::cell_value(cell)))
                .collect();

            if record.is_blank() {
                continue;
            }
            records.push(record);
        }

        debug!(sheet = %sheet_name, rows = records.len(), "worksheet parsed");
        Ok(records)
    }
}

// ==========================================
// JSON Parser
// ==========================================
// Accepts one object or an array of objects; key order is kept.
pub struct JsonParser;

impl JsonParser {
    fn json_value(value: &serde_json::Value) -> RawValue {
        match value {
            serde_json::Value::Null => RawValue::Empty,
            serde_json::Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or_default(),
            serde_json::Value::String(s) => RawValue::text(s.as_str()),
            serde_json::Value::Bool(b) => RawValue::Text(b.to_string()),
            other => RawValue::text(other.to_string()),
        }
    }

    fn object_to_record(object: &serde_json::Map<String, serde_json::Value>) -> RawRecord {
        object
            .iter()
            .map(|(key, value)| (key.trim().to_string(), Self::json_value(value)))
            .collect()
    }

    pub fn parse_str(&self, text: &str) -> ImportResult<Vec<RawRecord>> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let records = match &value {
            serde_json::Value::Object(object) => vec![Self::object_to_record(object)],
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::Object(object) => Ok(Self::object_to_record(object)),
                    other => Err(ImportError::JsonParseError(format!(
                        "expected an object per record, found {}",
                        other
                    ))),
                })
                .collect::<ImportResult<Vec<_>>>()?,
            other => {
                return Err(ImportError::JsonParseError(format!(
                    "expected an object or array, found {}",
                    other
                )))
            }
        };
        Ok(records.into_iter().filter(|r| !r.is_blank()).collect())
    }
}

impl FileParser for JsonParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;
        let text = fs::read_to_string(file_path)?;
        self.parse_str(&text)
    }
}

// ==========================================
// Universal parser (dispatch on extension)
// ==========================================
pub struct UniversalFileParser {
    sheet: String,
}

impl UniversalFileParser {
    pub fn new(sheet: Option<&str>) -> Self {
        Self {
            sheet: sheet.unwrap_or(DEFAULT_SHEET).to_string(),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" => ExcelParser::new(self.sheet.clone()).parse_to_raw_records(path),
            "json" => JsonParser.parse_to_raw_records(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(None)
    }
}
