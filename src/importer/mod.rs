// ==========================================
// Wood QC Report - Import layer
// ==========================================
// Responsibility: record sources and the first two pipeline stages
// Flow: sheet → RawRecord → field resolution → value normalization
// Supports: Excel, CSV, JSON
// ==========================================

pub mod dq_validator;
pub mod error;
pub mod field_resolver;
pub mod file_parser;
pub mod record_loader;
pub mod value_normalizer;

pub use dq_validator::DqValidator;
pub use error::{ImportError, ImportResult};
pub use field_resolver::{resolve, resolve_text, FieldResolver};
pub use file_parser::{CsvParser, ExcelParser, FileParser, JsonParser, UniversalFileParser, DEFAULT_SHEET};
pub use record_loader::{RecordLoader, RecordSelector};
pub use value_normalizer::{
    correct_scaled_columns, format_decimal, format_decimal_with, normalize_date_as, parse_decimal, NormalizerOptions,
    ScaleRule, ValueNormalizer, CANONICAL_DATE_FORMAT,
};
