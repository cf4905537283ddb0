// ==========================================
// Wood QC Report - Report engine
// ==========================================
// Flow: RawRecord → FieldResolver → ValueNormalizer → MetricsCalculator
//       → ComplianceEvaluator → DisplayRecord → certificate layout → PDF
// One record in, one document out; no state survives a call.
// ==========================================

use crate::archive::report_file_name;
use crate::config::EngineConfig;
use crate::domain::{CanonicalField, CanonicalRecord, DerivedMetrics, DqFinding, DqLevel, RawRecord};
use crate::engine::compliance::ComplianceEvaluator;
use crate::engine::display::DisplayRecord;
use crate::engine::metrics::{MetricsCalculator, MetricsInput};
use crate::importer::dq_validator::DqValidator;
use crate::importer::field_resolver::FieldResolver;
use crate::importer::value_normalizer::ValueNormalizer;
use crate::report::{compose_certificate, ReportDocument};
use serde::Serialize;
use tracing::{info, instrument, warn};

// ==========================================
// GeneratedReport
// ==========================================
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub fields: CanonicalRecord,
    pub metrics: DerivedMetrics,
    pub findings: Vec<DqFinding>,
}

/// Everything computed for a sample short of drawing it.
#[derive(Debug, Clone, Serialize)]
pub struct SampleAnalysis {
    pub fields: CanonicalRecord,
    pub metrics: DerivedMetrics,
    pub display: DisplayRecord,
    pub findings: Vec<DqFinding>,
}

// ==========================================
// ReportEngine
// ==========================================
pub struct ReportEngine {
    config: EngineConfig,
    normalizer: ValueNormalizer,
    calculator: MetricsCalculator,
}

impl ReportEngine {
    pub fn new(config: EngineConfig) -> Self {
        let normalizer = ValueNormalizer::new(config.normalizer.clone());
        Self {
            config,
            normalizer,
            calculator: MetricsCalculator::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &ValueNormalizer {
        &self.normalizer
    }

    pub fn resolve(&self, raw: &RawRecord) -> CanonicalRecord {
        FieldResolver::new(&self.config.fields).resolve_all(raw)
    }

    /// Pure function of the resolved fields.
    pub fn derive(&self, fields: &CanonicalRecord) -> DerivedMetrics {
        let input = MetricsInput::from_fields(fields, &self.normalizer);
        let sample = self.calculator.calculate(&input);

        let evaluator = ComplianceEvaluator::new(&self.config.compliance);
        let compliance = evaluator.evaluate(
            &fields.text(CanonicalField::Application),
            sample.total_retention_kg_m3,
            self.normalizer.grade_code(fields.get(CanonicalField::Grade)),
        );

        DerivedMetrics { sample, compliance }
    }

    pub fn display(&self, fields: &CanonicalRecord, metrics: &DerivedMetrics) -> DisplayRecord {
        DisplayRecord::build(fields, metrics, &self.normalizer, &self.config.compliance)
    }

    pub fn validate(&self, fields: &CanonicalRecord, metrics: &DerivedMetrics) -> Vec<DqFinding> {
        DqValidator::new(&self.config.compliance, &self.normalizer).validate(fields, metrics)
    }

    pub fn compose(&self, display: &DisplayRecord) -> ReportDocument {
        compose_certificate(display, &self.config.report)
    }

    pub fn analyze(&self, raw: &RawRecord) -> SampleAnalysis {
        let fields = self.resolve(raw);
        let metrics = self.derive(&fields);
        let display = self.display(&fields, &metrics);
        let findings = self.validate(&fields, &metrics);
        SampleAnalysis {
            fields,
            metrics,
            display,
            findings,
        }
    }

    /// Never fails: missing or malformed input degrades to blank cells.
    pub fn generate(&self, raw: &RawRecord) -> GeneratedReport {
        self.generate_named(raw, &self.config.report.fallback_file_stem)
    }

    /// As [`generate`](Self::generate), naming the file `<fallback_stem>.pdf`
    /// when the sample has no identifier.
    #[instrument(skip(self, raw), fields(keys = raw.len()))]
    pub fn generate_named(&self, raw: &RawRecord, fallback_stem: &str) -> GeneratedReport {
        let analysis = self.analyze(raw);

        for finding in &analysis.findings {
            match finding.level {
                DqLevel::Error | DqLevel::Warning => {
                    warn!(level = %finding.level, field = %finding.field, "{}", finding.message)
                }
                DqLevel::Info => info!(field = %finding.field, "{}", finding.message),
            }
        }

        let document = self.compose(&analysis.display);
        let bytes = document.to_pdf_bytes();
        let file_name = report_file_name(&analysis.display.sample_id, fallback_stem);

        info!(
            file_name = %file_name,
            pages = document.page_count(),
            bytes = bytes.len(),
            total_retention = analysis.metrics.sample.total_retention_kg_m3,
            verdict = analysis.metrics.compliance.verdict_text.as_deref().unwrap_or("-"),
            "report generated"
        );

        GeneratedReport {
            file_name,
            bytes,
            page_count: document.page_count(),
            fields: analysis.fields,
            metrics: analysis.metrics,
            findings: analysis.findings,
        }
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Verdict;

    #[test]
    fn test_derive_is_pure() {
        let engine = ReportEngine::default();
        let raw = RawRecord::from_pairs([
            ("Cromo (%)", "1.2"),
            ("Cobre (%)", "0.5"),
            ("Arsênio (%)", "0.3"),
            ("Aplicação", "Cruzetas"),
            ("Diâmetro 1", "50"),
            ("Comprimento 1", "100"),
            ("Massa 1", "120"),
        ]);
        let fields = engine.resolve(&raw);

        assert_eq!(engine.derive(&fields), engine.derive(&fields));
        assert_eq!(
            engine.derive(&fields).compliance.expected_retention_kg_m3,
            Some(9.6)
        );
    }

    #[test]
    fn test_generate_blank_record() {
        let engine = ReportEngine::default();
        let report = engine.generate(&RawRecord::new());

        assert_eq!(report.file_name, "Relatorio.pdf");
        assert!(report.bytes.starts_with(b"%PDF-1.4"));
        assert_eq!(report.page_count, 1);
        assert!(report.metrics.compliance.verdict.is_none());
        assert!(!report.findings.is_empty());
    }

    #[test]
    fn test_generate_rejected_sample() {
        let engine = ReportEngine::default();
        let raw = RawRecord::from_pairs([
            ("Código UFV", "LPM/0042"),
            ("Cromo (%)", "0.2"),
            ("Aplicação", "Postes"),
            ("Diâmetro 1", "50"),
            ("Comprimento 1", "100"),
            ("Massa 1", "127.6"),
        ]);

        let report = engine.generate(&raw);

        assert_eq!(report.file_name, "LPM-0042.pdf");
        assert_eq!(report.metrics.compliance.verdict, Some(Verdict::Rejected));
    }

    #[test]
    fn test_generate_named_uses_stem_without_id() {
        let engine = ReportEngine::default();
        let report = engine.generate_named(&RawRecord::from_pairs([("Cliente", "Serraria Sul")]), "lote_marco");

        assert_eq!(report.file_name, "lote_marco.pdf");
    }
}
