// ==========================================
// Wood QC Report - Display record
// ==========================================
// Responsibility: merge resolved fields and derived metrics into the
// exact strings printed on the certificate
// Fallbacks: empty dates print "-", unmatched numbers print as typed,
// an unset chemical balance prints "-"
// ==========================================

use crate::config::ComplianceRules;
use crate::domain::{CanonicalField, CanonicalRecord, Compound, DerivedMetrics};
use crate::importer::value_normalizer::{format_decimal, format_decimal_with, ValueNormalizer};
use serde::Serialize;

const EMPTY_DATE: &str = "-";
const UNSET: &str = "-";

/// One row of the retention table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundRow {
    pub compound: Compound,
    pub retention_kg_m3: String,
    pub balance_percent: String,
    pub standard_min: String,
    pub standard_max: String,
}

/// Averages and density printed under "MEDIDAS FÍSICAS".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhysicalSummary {
    pub avg_diameter_cm: String,
    pub avg_length_cm: String,
    pub avg_mass_g: String,
    pub volume_cm3: String,
    pub density_kg_m3: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    // ===== Header =====
    pub entry_date: String,
    pub issue_date: String,
    pub sample_id: String,

    // ===== Client =====
    pub client_name: String,
    pub city_state: String,
    pub email: String,

    // ===== Sample =====
    pub client_reference: String,
    pub wood: String,
    pub product: String,
    pub application: String,
    pub standard: String,
    pub expected_retention: String,
    pub verdict: String,

    // ===== Results =====
    pub compounds: Vec<CompoundRow>,
    pub total_retention: String,
    pub total_balance: String,
    pub physical: PhysicalSummary,

    // ===== Penetration =====
    pub grade: String,
    pub grade_type: String,
    pub penetration_description: String,
    pub observation: String,
}

impl DisplayRecord {
    pub fn build(
        fields: &CanonicalRecord,
        metrics: &DerivedMetrics,
        normalizer: &ValueNormalizer,
        rules: &ComplianceRules,
    ) -> Self {
        use CanonicalField::*;

        let date = |field: CanonicalField| -> String {
            let value = fields.get(field);
            if value.is_empty() {
                EMPTY_DATE.to_string()
            } else {
                normalizer.normalize_date(value)
            }
        };

        let sample = &metrics.sample;
        let compliance = &metrics.compliance;

        let compounds = Compound::ALL
            .iter()
            .map(|compound| {
                let range = rules.normative_ranges.get(*compound);
                CompoundRow {
                    compound: *compound,
                    retention_kg_m3: format_decimal(sample.retention_kg_m3.get(*compound)),
                    balance_percent: sample
                        .balance_percent
                        .map(|b| format_decimal(b.get(*compound)))
                        .unwrap_or_else(|| UNSET.to_string()),
                    standard_min: format_decimal_with(range.min_percent, 1),
                    standard_max: format_decimal_with(range.max_percent, 1),
                }
            })
            .collect();

        let expected_retention = match compliance.expected_retention_kg_m3 {
            Some(threshold) => format_decimal(threshold),
            None => normalizer.display_number(fields.get(DeclaredRetention)),
        };

        let grade = match normalizer.grade_code(fields.get(Grade)) {
            Some(code) => code.to_string(),
            None => fields.text(Grade),
        };
        let grade_type = compliance
            .grade
            .as_ref()
            .map(|g| g.short.clone())
            .unwrap_or_else(|| fields.text(GradeType));
        let penetration_description = compliance
            .grade
            .as_ref()
            .map(|g| g.long.clone())
            .unwrap_or_else(|| fields.text(PenetrationDescription));

        Self {
            entry_date: date(EntryDate),
            issue_date: date(IssueDate),
            sample_id: fields.text(SampleId),
            client_name: fields.text(ClientName),
            city_state: join_present(&[fields.text(City), fields.text(State)], "/"),
            email: fields.text(Email),
            client_reference: fields.text(ClientReference),
            wood: fields.text(Wood),
            product: fields.text(Product),
            application: fields.text(Application),
            standard: fields.text(Standard),
            expected_retention,
            verdict: compliance.verdict_text.clone().unwrap_or_default(),
            compounds,
            total_retention: format_decimal(sample.total_retention_kg_m3),
            total_balance: sample
                .balance_percent
                .map(|b| format_decimal(b.sum()))
                .unwrap_or_else(|| UNSET.to_string()),
            physical: PhysicalSummary {
                avg_diameter_cm: format_decimal(sample.avg_diameter_cm),
                avg_length_cm: format_decimal(sample.avg_length_cm),
                avg_mass_g: format_decimal(sample.avg_mass_g),
                volume_cm3: format_decimal(sample.volume_cm3),
                density_kg_m3: format_decimal(sample.density_kg_m3),
            },
            grade,
            grade_type,
            penetration_description,
            observation: fields.text(Observation),
        }
    }
}

fn join_present(parts: &[String], separator: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplianceOutcome, CompoundSet, GradeDescription, SampleMetrics};

    fn metrics() -> DerivedMetrics {
        DerivedMetrics {
            sample: SampleMetrics {
                retention_kg_m3: CompoundSet::new(7.8, 3.25, 1.95),
                balance_percent: Some(CompoundSet::new(60.0, 25.0, 15.0)),
                total_retention_kg_m3: 13.0,
                density_kg_m3: 650.0,
                ..SampleMetrics::default()
            },
            compliance: ComplianceOutcome {
                expected_retention_kg_m3: Some(4.0),
                verdict: None,
                verdict_text: Some("APROVADO".to_string()),
                grade: Some(GradeDescription {
                    code: 1,
                    short: "Total".to_string(),
                    long: "Penetração total.".to_string(),
                }),
            },
        }
    }

    #[test]
    fn test_build_formats_results() {
        let fields = CanonicalRecord::new()
            .with(CanonicalField::SampleId, "A-01")
            .with(CanonicalField::City, "Viçosa")
            .with(CanonicalField::State, "MG")
            .with(CanonicalField::EntryDate, "2024-03-05 00:00:00")
            .with(CanonicalField::Grade, 1.0);

        let display = DisplayRecord::build(
            &fields,
            &metrics(),
            &ValueNormalizer::default(),
            &ComplianceRules::default(),
        );

        assert_eq!(display.entry_date, "05/03/2024");
        assert_eq!(display.issue_date, "-");
        assert_eq!(display.city_state, "Viçosa/MG");
        assert_eq!(display.expected_retention, "4,00");
        assert_eq!(display.verdict, "APROVADO");
        assert_eq!(display.compounds[0].retention_kg_m3, "7,80");
        assert_eq!(display.compounds[0].standard_min, "41,8");
        assert_eq!(display.compounds[2].standard_max, "40,7");
        assert_eq!(display.total_retention, "13,00");
        assert_eq!(display.total_balance, "100,00");
        assert_eq!(display.physical.density_kg_m3, "650,00");
        assert_eq!(display.grade, "1");
        assert_eq!(display.grade_type, "Total");
    }

    #[test]
    fn test_fallbacks_for_missing_values() {
        let fields = CanonicalRecord::new()
            .with(CanonicalField::DeclaredRetention, "ver norma")
            .with(CanonicalField::GradeType, "Parcial")
            .with(CanonicalField::PenetrationDescription, "Anel periférico")
            .with(CanonicalField::State, "MG");

        let display = DisplayRecord::build(
            &fields,
            &DerivedMetrics::default(),
            &ValueNormalizer::default(),
            &ComplianceRules::default(),
        );

        assert_eq!(display.expected_retention, "ver norma");
        assert_eq!(display.verdict, "");
        assert_eq!(display.compounds[1].balance_percent, "-");
        assert_eq!(display.total_balance, "-");
        assert_eq!(display.grade_type, "Parcial");
        assert_eq!(display.penetration_description, "Anel periférico");
        assert_eq!(display.city_state, "MG");
    }
}
