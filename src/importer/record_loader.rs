// ==========================================
// Wood QC Report - Record loader
// ==========================================
// Responsibility: read side of the record store
// Flow: parse file → column scale correction → select one sample
// ==========================================

use crate::config::{EngineConfig, FieldSchema};
use crate::domain::{CanonicalField, RawRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_resolver::resolve_text;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::value_normalizer::{correct_scaled_columns, NormalizerOptions};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Which row of a loaded sheet to report on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSelector {
    First,
    /// 1-based data row (header excluded).
    Row(usize),
    /// Matched against the resolved sample identifier.
    Sample(String),
}

pub struct RecordLoader<'a> {
    parser: UniversalFileParser,
    schema: &'a FieldSchema,
    options: &'a NormalizerOptions,
}

impl<'a> RecordLoader<'a> {
    pub fn new(config: &'a EngineConfig, sheet: Option<&str>) -> Self {
        Self {
            parser: UniversalFileParser::new(sheet),
            schema: &config.fields,
            options: &config.normalizer,
        }
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> ImportResult<Vec<RawRecord>> {
        let mut records = self.parser.parse(path)?;
        if records.is_empty() {
            return Err(ImportError::NoRecords(path.display().to_string()));
        }

        if self.options.correct_columns_on_load {
            records = records
                .iter()
                .map(|record| correct_scaled_columns(record, self.options))
                .collect();
            debug!("scale correction applied to configured columns");
        }

        info!(rows = records.len(), "records loaded");
        Ok(records)
    }

    pub fn select(&self, records: Vec<RawRecord>, selector: &RecordSelector) -> ImportResult<RawRecord> {
        let available = records.len();
        match selector {
            RecordSelector::First => records
                .into_iter()
                .next()
                .ok_or_else(|| ImportError::NoRecords("record set".to_string())),
            RecordSelector::Row(row) => {
                if *row == 0 || *row > available {
                    return Err(ImportError::RowOutOfRange {
                        row: *row,
                        available,
                    });
                }
                records
                    .into_iter()
                    .nth(row - 1)
                    .ok_or(ImportError::RowOutOfRange {
                        row: *row,
                        available,
                    })
            }
            RecordSelector::Sample(id) => {
                let wanted = id.trim();
                let candidates = self.schema.candidates(CanonicalField::SampleId);
                records
                    .into_iter()
                    .find(|record| resolve_text(record, candidates) == wanted)
                    .ok_or_else(|| ImportError::SampleNotFound(wanted.to_string()))
            }
        }
    }

    pub fn load_one(&self, path: &Path, selector: &RecordSelector) -> ImportResult<RawRecord> {
        let records = self.load(path)?;
        self.select(records, selector)
    }
}
