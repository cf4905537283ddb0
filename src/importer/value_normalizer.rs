// ==========================================
// Wood QC Report - Value normalizer
// ==========================================
// Responsibility: raw cell values → clean numbers, dates and display text
// - dates: known layouts tried in priority order, rendered dd/mm/yyyy;
//   unparseable input comes back trimmed and unchanged
// - numbers: decimal point or decimal comma; arithmetic fields fall back to 0,
//   display fields fall back to the raw text
// - scale correction for percentages typed without their decimal separator
// ==========================================

use crate::domain::{DateLayout, RawRecord, RawValue};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Canonical day/month/year rendering.
pub const CANONICAL_DATE_FORMAT: &str = "%d/%m/%Y";

// ==========================================
// ScaleRule
// ==========================================
// While the value exceeds `bound`, divide by `divisor`, at most `max_passes` times.
// Values at or below the bound are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleRule {
    pub bound: f64,
    pub divisor: f64,
    pub max_passes: u8,
}

impl Default for ScaleRule {
    fn default() -> Self {
        Self {
            bound: 100.0,
            divisor: 100.0,
            max_passes: 2,
        }
    }
}

impl ScaleRule {
    /// Divide once at most.
    pub const fn single_pass() -> Self {
        Self {
            bound: 100.0,
            divisor: 100.0,
            max_passes: 1,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        if self.divisor <= 1.0 || !value.is_finite() {
            return value;
        }
        let mut corrected = value;
        for _ in 0..self.max_passes {
            if corrected <= self.bound {
                break;
            }
            corrected /= self.divisor;
        }
        corrected
    }
}

// ==========================================
// NormalizerOptions
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerOptions {
    /// Tried in order; the first layout that parses wins.
    pub date_layouts: Vec<DateLayout>,
    pub scale_rule: ScaleRule,
    /// Apply the scale rule to matching columns when a sheet is loaded.
    pub correct_columns_on_load: bool,
    /// Header fragments (case-insensitive) whose columns hold scaled quantities.
    pub scaled_columns: Vec<String>,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            date_layouts: vec![
                DateLayout::YearFirst,
                DateLayout::DayFirst,
                DateLayout::MonthFirst,
            ],
            scale_rule: ScaleRule::default(),
            correct_columns_on_load: true,
            scaled_columns: [
                "Retenção",
                "Retenção Cromo",
                "Retenção Cobre",
                "Retenção Arsênio",
                "Balanço Cromo",
                "Balanço Cobre",
                "Balanço Arsênio",
                "Soma Concentração",
                "Balanço Total",
                "Soma",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

// ==========================================
// ValueNormalizer
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ValueNormalizer {
    options: NormalizerOptions,
}

impl ValueNormalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Parsed number, `None` when empty or unparseable.
    pub fn optional_number(&self, value: &RawValue) -> Option<f64> {
        match value {
            RawValue::Number(n) if n.is_finite() => Some(*n),
            RawValue::Text(s) => parse_decimal(s),
            _ => None,
        }
    }

    /// Number for arithmetic: empty or unparseable input yields 0.
    pub fn number(&self, value: &RawValue) -> f64 {
        match self.optional_number(value) {
            Some(n) => n,
            None => {
                if !value.is_empty() {
                    debug!(raw = %value, "unparseable number, using 0");
                }
                0.0
            }
        }
    }

    /// Number with the scale correction applied.
    pub fn scaled_number(&self, value: &RawValue) -> f64 {
        self.options.scale_rule.apply(self.number(value))
    }

    /// Display form "1.234,56"; unparseable text passes through unchanged.
    pub fn display_number(&self, value: &RawValue) -> String {
        if value.is_empty() {
            return String::new();
        }
        match self.optional_number(value) {
            Some(n) => format_decimal(n),
            None => value.as_text(),
        }
    }

    pub fn parse_date(&self, value: &RawValue) -> Option<NaiveDate> {
        parse_date_with(&value.as_text(), &self.options.date_layouts)
    }

    /// dd/mm/yyyy when a layout parses, otherwise the trimmed original text.
    pub fn normalize_date(&self, value: &RawValue) -> String {
        match self.parse_date(value) {
            Some(date) => date.format(CANONICAL_DATE_FORMAT).to_string(),
            None => value.as_text(),
        }
    }

    /// Integral grade code; fractional, non-positive or non-numeric input gives `None`.
    pub fn grade_code(&self, value: &RawValue) -> Option<u8> {
        let n = self.optional_number(value)?;
        let rounded = n.round();
        if (rounded - n).abs() > 1e-9 || rounded < 1.0 || rounded > u8::MAX as f64 {
            return None;
        }
        Some(rounded as u8)
    }
}

// ==========================================
// Free helpers
// ==========================================

/// Parse "1.5", "1,5", "1.234,5", "1,234.5" or "12%"; non-finite results are rejected.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Date portion of a cell, dropping any trailing time ("2024-03-05 00:00:00", "2024-03-05T10:00").
fn date_part(text: &str) -> &str {
    text.trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or("")
}

pub fn parse_date_with(text: &str, layouts: &[DateLayout]) -> Option<NaiveDate> {
    let candidate = date_part(text);
    if candidate.is_empty() {
        return None;
    }
    layouts.iter().find_map(|layout| {
        layout
            .patterns()
            .iter()
            .find_map(|pattern| NaiveDate::parse_from_str(candidate, pattern).ok())
    })
}

/// Normalize a date known to be written in `layout`.
pub fn normalize_date_as(text: &str, layout: DateLayout) -> String {
    match parse_date_with(text, &[layout]) {
        Some(date) => date.format(CANONICAL_DATE_FORMAT).to_string(),
        None => text.trim().to_string(),
    }
}

/// Two decimals, "." thousands separator, "," decimal separator.
pub fn format_decimal(value: f64) -> String {
    format_decimal_with(value, 2)
}

/// Same grouping as [`format_decimal`] with `places` decimals.
pub fn format_decimal_with(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let rounded = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{},{}", sign, grouped, frac_part)
    }
}

/// Copy of `record` with the scale rule applied to numeric values of the
/// configured columns. Non-numeric text is left as typed.
pub fn correct_scaled_columns(record: &RawRecord, options: &NormalizerOptions) -> RawRecord {
    let targets: Vec<String> = options
        .scaled_columns
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    let rule = options.scale_rule;

    record
        .iter()
        .map(|(key, value)| {
            let lowered = key.to_lowercase();
            if !targets.iter().any(|t| lowered.contains(t.as_str())) {
                return (key.to_string(), value.clone());
            }
            let corrected = match value {
                RawValue::Number(n) => RawValue::Number(rule.apply(*n)),
                RawValue::Text(s) => match parse_decimal(s) {
                    Some(n) => RawValue::Number(rule.apply(n)),
                    None => value.clone(),
                },
                RawValue::Empty => RawValue::Empty,
            };
            (key.to_string(), corrected)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_scale_rule_leaves_bounded_values() {
        let rule = ScaleRule::default();
        assert_eq!(rule.apply(3.68), 3.68);
        assert_eq!(rule.apply(100.0), 100.0);
        assert_eq!(rule.apply(0.0), 0.0);
    }

    #[test]
    fn test_scale_rule_divides_once_above_bound() {
        assert!(approx(ScaleRule::default().apply(368.0), 3.68));
    }

    #[test]
    fn test_scale_rule_repeats_until_bounded() {
        let corrected = ScaleRule::default().apply(45800.0);
        assert!(corrected <= 100.0);
        assert!(approx(corrected, 4.58));

        // single-pass variant stops after one division
        assert!(approx(ScaleRule::single_pass().apply(45800.0), 458.0));
    }

    #[test]
    fn test_scale_rule_is_idempotent() {
        let rule = ScaleRule::default();
        for raw in [0.5, 42.0, 368.0, 45800.0] {
            let once = rule.apply(raw);
            assert_eq!(rule.apply(once), once);
        }
    }

    #[test]
    fn test_parse_decimal_separators() {
        assert_eq!(parse_decimal("1.5"), Some(1.5));
        assert_eq!(parse_decimal("1,5"), Some(1.5));
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("1,234.56"), Some(1234.56));
        assert_eq!(parse_decimal(" 12 % "), Some(12.0));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_number_falls_back_to_zero() {
        let normalizer = ValueNormalizer::default();
        assert_eq!(normalizer.number(&RawValue::text("n/d")), 0.0);
        assert_eq!(normalizer.number(&RawValue::Empty), 0.0);
        assert_eq!(normalizer.number(&RawValue::text("2,5")), 2.5);
    }

    #[test]
    fn test_display_number_passes_text_through() {
        let normalizer = ValueNormalizer::default();
        assert_eq!(normalizer.display_number(&RawValue::Number(1234.5)), "1.234,50");
        assert_eq!(normalizer.display_number(&RawValue::text("ver laudo")), "ver laudo");
        assert_eq!(normalizer.display_number(&RawValue::Empty), "");
    }

    #[test]
    fn test_date_round_trip_per_layout() {
        assert_eq!(normalize_date_as("2024-03-05", DateLayout::YearFirst), "05/03/2024");
        assert_eq!(normalize_date_as("03/05/2024", DateLayout::MonthFirst), "05/03/2024");
        assert_eq!(normalize_date_as("05/03/2024", DateLayout::DayFirst), "05/03/2024");
    }

    #[test]
    fn test_date_time_component_discarded() {
        let normalizer = ValueNormalizer::default();
        assert_eq!(
            normalizer.normalize_date(&RawValue::text("2024-03-05 00:00:00")),
            "05/03/2024"
        );
        assert_eq!(
            normalizer.normalize_date(&RawValue::text("2024-03-05T14:30:00")),
            "05/03/2024"
        );
    }

    #[test]
    fn test_date_priority_order() {
        // day-first is tried before month-first by default
        let normalizer = ValueNormalizer::default();
        assert_eq!(normalizer.normalize_date(&RawValue::text("05/03/2024")), "05/03/2024");
        // only month-first can parse a 13+ second component
        assert_eq!(normalizer.normalize_date(&RawValue::text("03/25/2024")), "25/03/2024");
    }

    #[test]
    fn test_date_failure_returns_original() {
        let normalizer = ValueNormalizer::default();
        assert_eq!(normalizer.normalize_date(&RawValue::text("  março/24 ")), "março/24");
        assert_eq!(normalizer.normalize_date(&RawValue::Empty), "");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(0.0), "0,00");
        assert_eq!(format_decimal(7.8), "7,80");
        assert_eq!(format_decimal(1234567.891), "1.234.567,89");
        assert_eq!(format_decimal(-3.256), "-3,26");
        assert_eq!(format_decimal(-0.001), "0,00");
        assert_eq!(format_decimal(999.999), "1.000,00");
        assert_eq!(format_decimal_with(41.8, 1), "41,8");
        assert_eq!(format_decimal_with(1234.4, 0), "1.234");
    }

    #[test]
    fn test_grade_code() {
        let normalizer = ValueNormalizer::default();
        assert_eq!(normalizer.grade_code(&RawValue::Number(2.0)), Some(2));
        assert_eq!(normalizer.grade_code(&RawValue::text("3")), Some(3));
        assert_eq!(normalizer.grade_code(&RawValue::text("2,5")), None);
        assert_eq!(normalizer.grade_code(&RawValue::text("0")), None);
        assert_eq!(normalizer.grade_code(&RawValue::text("Total")), None);
    }

    #[test]
    fn test_correct_scaled_columns() {
        let record = RawRecord::from_pairs([
            ("Retenção Cromo", RawValue::text("780")),
            ("Balanço Cobre", RawValue::Number(2500.0)),
            ("Soma", RawValue::text("n/d")),
            ("Diâmetro 1", RawValue::Number(150.0)),
        ]);

        let corrected = correct_scaled_columns(&record, &NormalizerOptions::default());

        assert_eq!(corrected.get("Retenção Cromo"), Some(&RawValue::Number(7.8)));
        assert_eq!(corrected.get("Balanço Cobre"), Some(&RawValue::Number(25.0)));
        assert_eq!(corrected.get("Soma"), Some(&RawValue::text("n/d")));
        assert_eq!(corrected.get("Diâmetro 1"), Some(&RawValue::Number(150.0)));
    }
}
