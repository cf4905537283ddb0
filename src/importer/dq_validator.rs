// ==========================================
// Wood QC Report - Data-quality validator
// ==========================================
// Responsibility: flag inputs that will render blank or degenerate
// Levels: ERROR identification missing / WARNING degenerate result / INFO optional input
// Findings never stop a report from being generated.
// ==========================================

use crate::config::ComplianceRules;
use crate::domain::{CanonicalField, CanonicalRecord, DerivedMetrics, DqFinding, DqLevel};
use crate::importer::value_normalizer::ValueNormalizer;

pub struct DqValidator<'a> {
    rules: &'a ComplianceRules,
    normalizer: &'a ValueNormalizer,
}

impl<'a> DqValidator<'a> {
    pub fn new(rules: &'a ComplianceRules, normalizer: &'a ValueNormalizer) -> Self {
        Self { rules, normalizer }
    }

    /// All findings for one sample, ordered by check.
    pub fn validate(&self, fields: &CanonicalRecord, metrics: &DerivedMetrics) -> Vec<DqFinding> {
        let mut findings = Vec::new();
        findings.extend(self.validate_required_fields(fields));
        findings.extend(self.validate_measurements(metrics));
        findings.extend(self.validate_compliance(fields, metrics));
        findings.extend(self.validate_dates(fields));
        findings
    }

    /// Identification fields printed in the certificate header.
    fn validate_required_fields(&self, fields: &CanonicalRecord) -> Vec<DqFinding> {
        let mut findings = Vec::new();

        if !fields.is_present(CanonicalField::SampleId) {
            findings.push(DqFinding::new(
                DqLevel::Error,
                CanonicalField::SampleId.key(),
                "sample identifier missing; generic file name used",
            ));
        }
        if !fields.is_present(CanonicalField::ClientName) {
            findings.push(DqFinding::new(
                DqLevel::Error,
                CanonicalField::ClientName.key(),
                "client name missing",
            ));
        }
        if !fields.is_present(CanonicalField::Application) {
            findings.push(DqFinding::new(
                DqLevel::Error,
                CanonicalField::Application.key(),
                "application missing; no verdict can be issued",
            ));
        }

        findings
    }

    fn validate_measurements(&self, metrics: &DerivedMetrics) -> Vec<DqFinding> {
        let mut findings = Vec::new();
        let sample = &metrics.sample;

        if sample.volume_cm3 <= 0.0 {
            findings.push(DqFinding::new(
                DqLevel::Warning,
                "volume",
                "diameter/length replicates missing; volume, density and retention are zero",
            ));
        } else if sample.avg_mass_g <= 0.0 {
            findings.push(DqFinding::new(
                DqLevel::Warning,
                "density",
                "mass replicates missing; density and retention are zero",
            ));
        }

        if sample.percentages.sum() <= 0.0 {
            findings.push(DqFinding::new(
                DqLevel::Warning,
                "compound_percent",
                "compound percentages sum to zero; chemical balance not computed",
            ));
        }

        for (compound, pct) in sample.percentages.iter() {
            if pct < 0.0 {
                findings.push(DqFinding::new(
                    DqLevel::Warning,
                    CanonicalField::CompoundPercent(compound).key(),
                    format!("negative percentage: {:.3}", pct),
                ));
            } else if pct > 100.0 {
                findings.push(DqFinding::new(
                    DqLevel::Warning,
                    CanonicalField::CompoundPercent(compound).key(),
                    format!("percentage still above 100 after scale correction: {:.3}", pct),
                ));
            }
        }

        findings
    }

    fn validate_compliance(&self, fields: &CanonicalRecord, metrics: &DerivedMetrics) -> Vec<DqFinding> {
        let mut findings = Vec::new();

        let application = fields.text(CanonicalField::Application);
        if !application.is_empty() && metrics.compliance.expected_retention_kg_m3.is_none() {
            findings.push(DqFinding::new(
                DqLevel::Warning,
                CanonicalField::Application.key(),
                format!("no retention threshold for application '{}'", application),
            ));
        }

        let grade = fields.get(CanonicalField::Grade);
        if grade.is_empty() {
            findings.push(DqFinding::new(
                DqLevel::Info,
                CanonicalField::Grade.key(),
                "penetration grade not informed",
            ));
        } else {
            let known = self
                .normalizer
                .grade_code(grade)
                .and_then(|code| self.rules.grade(code))
                .is_some();
            if !known {
                findings.push(DqFinding::new(
                    DqLevel::Warning,
                    CanonicalField::Grade.key(),
                    format!("grade '{}' is not a known code", grade),
                ));
            }
        }

        findings
    }

    /// Dates that no layout recognises are printed as typed.
    fn validate_dates(&self, fields: &CanonicalRecord) -> Vec<DqFinding> {
        [CanonicalField::EntryDate, CanonicalField::IssueDate]
            .into_iter()
            .filter(|field| fields.is_present(*field))
            .filter(|field| self.normalizer.parse_date(fields.get(*field)).is_none())
            .map(|field| {
                DqFinding::new(
                    DqLevel::Info,
                    field.key(),
                    format!("date '{}' not recognised; printed as typed", fields.get(field)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplianceOutcome, CompoundSet, SampleMetrics};

    fn complete_fields() -> CanonicalRecord {
        CanonicalRecord::new()
            .with(CanonicalField::SampleId, "A-01")
            .with(CanonicalField::ClientName, "Serraria Boa Vista")
            .with(CanonicalField::Application, "Postes")
            .with(CanonicalField::Grade, 1.0)
            .with(CanonicalField::EntryDate, "2024-03-05")
    }

    fn healthy_metrics() -> DerivedMetrics {
        DerivedMetrics {
            sample: SampleMetrics {
                avg_mass_g: 127.6,
                volume_cm3: 196.3,
                percentages: CompoundSet::new(1.2, 0.5, 0.3),
                ..SampleMetrics::default()
            },
            compliance: ComplianceOutcome {
                expected_retention_kg_m3: Some(4.0),
                ..ComplianceOutcome::default()
            },
        }
    }

    #[test]
    fn test_complete_sample_has_no_findings() {
        let rules = ComplianceRules::default();
        let normalizer = ValueNormalizer::default();
        let validator = DqValidator::new(&rules, &normalizer);

        let findings = validator.validate(&complete_fields(), &healthy_metrics());

        assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
    }

    #[test]
    fn test_blank_sample_reports_errors_and_warnings() {
        let rules = ComplianceRules::default();
        let normalizer = ValueNormalizer::default();
        let validator = DqValidator::new(&rules, &normalizer);

        let findings = validator.validate(&CanonicalRecord::new(), &DerivedMetrics::default());

        let errors = findings.iter().filter(|f| f.level == DqLevel::Error).count();
        assert_eq!(errors, 3);
        assert!(findings.iter().any(|f| f.field == "volume"));
        assert!(findings.iter().any(|f| f.field == "compound_percent"));
        assert!(findings
            .iter()
            .any(|f| f.field == "grade" && f.level == DqLevel::Info));
    }

    #[test]
    fn test_unknown_grade_and_application() {
        let rules = ComplianceRules::default();
        let normalizer = ValueNormalizer::default();
        let validator = DqValidator::new(&rules, &normalizer);
        let fields = complete_fields()
            .with(CanonicalField::Grade, 7.0)
            .with(CanonicalField::Application, "Móveis");
        let mut metrics = healthy_metrics();
        metrics.compliance.expected_retention_kg_m3 = None;

        let findings = validator.validate(&fields, &metrics);

        assert!(findings
            .iter()
            .any(|f| f.field == "grade" && f.level == DqLevel::Warning));
        assert!(findings
            .iter()
            .any(|f| f.field == "application" && f.message.contains("Móveis")));
    }

    #[test]
    fn test_unrecognised_date_is_info() {
        let rules = ComplianceRules::default();
        let normalizer = ValueNormalizer::default();
        let validator = DqValidator::new(&rules, &normalizer);
        let fields = complete_fields().with(CanonicalField::EntryDate, "março de 2024");

        let findings = validator.validate(&fields, &healthy_metrics());

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "entry_date");
        assert_eq!(findings[0].level, DqLevel::Info);
    }
}
