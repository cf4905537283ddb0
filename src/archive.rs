// ==========================================
// Wood QC Report - Report archive
// ==========================================
// Responsibility: file naming and year/month placement of finished reports
// Layout: <root>/<year>/<month name in Portuguese>/<file name>
// ==========================================

use crate::domain::{DateLayout, RawValue};
use crate::importer::value_normalizer::parse_date_with;
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const MONTHS_PT: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

/// Entry dates in the register are written day-first.
const PLACEMENT_LAYOUTS: [DateLayout; 3] = [
    DateLayout::DayFirst,
    DateLayout::YearFirst,
    DateLayout::MonthFirst,
];

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("failed to create archive folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Path separators would split the name into folders.
pub fn sanitize_file_name(name: &str) -> String {
    name.trim().replace(['/', '\\'], "-")
}

/// "<sample id>.pdf", or "<fallback>.pdf" without an id.
pub fn report_file_name(sample_id: &str, fallback_stem: &str) -> String {
    let stem = sample_id.trim();
    let stem = if stem.is_empty() { fallback_stem } else { stem };
    format!("{}.pdf", sanitize_file_name(stem))
}

/// Fallback stem for the `index`-th (0-based) record. Batch runs number the
/// stem so id-less rows do not overwrite each other.
pub fn batch_fallback_stem(fallback_stem: &str, index: usize, batch: bool) -> String {
    if batch {
        format!("{}-{}", fallback_stem, index + 1)
    } else {
        fallback_stem.to_string()
    }
}

/// Entry date, or `today` when it is empty or unreadable.
pub fn placement_date(entry_date: &RawValue, today: NaiveDate) -> NaiveDate {
    if entry_date.is_empty() {
        return today;
    }
    match parse_date_with(&entry_date.as_text(), &PLACEMENT_LAYOUTS) {
        Some(date) => date,
        None => {
            debug!(raw = %entry_date, "entry date unreadable, archiving under today");
            today
        }
    }
}

pub fn archive_folder(root: &Path, date: NaiveDate) -> PathBuf {
    let month = MONTHS_PT[date.month0() as usize];
    root.join(date.year().to_string()).join(month)
}

/// Write `bytes` under the entry date's year/month folder, creating it as needed.
pub fn archive_document(
    root: &Path,
    file_name: &str,
    bytes: &[u8],
    entry_date: &RawValue,
    today: NaiveDate,
) -> Result<PathBuf, ArchiveError> {
    let folder = archive_folder(root, placement_date(entry_date, today));
    fs::create_dir_all(&folder).map_err(|source| ArchiveError::CreateDir {
        path: folder.clone(),
        source,
    })?;

    let path = folder.join(sanitize_file_name(file_name));
    fs::write(&path, bytes).map_err(|source| ArchiveError::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "report archived");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("LPM/12\\A", "Relatorio"), "LPM-12-A.pdf");
        assert_eq!(report_file_name("  ", "Relatorio"), "Relatorio.pdf");
    }

    #[test]
    fn test_batch_fallback_stem() {
        assert_eq!(batch_fallback_stem("Relatorio", 0, false), "Relatorio");
        assert_eq!(batch_fallback_stem("Relatorio", 2, true), "Relatorio-3");
        assert_eq!(report_file_name("", &batch_fallback_stem("Relatorio", 0, false)), "Relatorio.pdf");
    }

    #[test]
    fn test_placement_prefers_day_first() {
        let date = placement_date(&RawValue::text("05/03/2024"), today());
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        let iso = placement_date(&RawValue::text("2024-11-20 00:00:00"), today());
        assert_eq!(iso, NaiveDate::from_ymd_opt(2024, 11, 20).unwrap());
    }

    #[test]
    fn test_placement_falls_back_to_today() {
        assert_eq!(placement_date(&RawValue::Empty, today()), today());
        assert_eq!(placement_date(&RawValue::text("NaT"), today()), today());
        assert_eq!(placement_date(&RawValue::text("sem data"), today()), today());
    }

    #[test]
    fn test_archive_folder_uses_portuguese_month() {
        let folder = archive_folder(Path::new("/reports"), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(folder, PathBuf::from("/reports/2024/Março"));
    }
}
