// ==========================================
// ReportEngine end-to-end tests
// ==========================================
// Flow: raw row → fields → metrics → verdict → certificate PDF
// ==========================================


use test_helpers::{approx, pole_sample};
use wood_qc_report::domain::{CanonicalField, Compound};
use wood_qc_report::{logging, DqLevel, RawRecord, RawValue, ReportEngine, Verdict};

#[test]
fn test_pole_sample_metrics() {
    logging::init_test();
    let engine = ReportEngine::default();
    let fields = engine.resolve(&pole_sample());
    let metrics = engine.derive(&fields);

    let sample = &metrics.sample;
    assert!(approx(sample.avg_diameter_cm, 5.0, 1e-9));
    assert!(approx(sample.avg_length_cm, 10.0, 1e-9));
    assert!(approx(sample.volume_cm3, 196.35, 0.01));
    assert!(approx(sample.density_kg_m3, 650.0, 0.01));
    assert!(approx(sample.retention_kg_m3.get(Compound::Chromium), 7.8, 0.01));
    assert!(approx(sample.retention_kg_m3.get(Compound::Copper), 3.25, 0.01));
    assert!(approx(sample.retention_kg_m3.get(Compound::Arsenic), 1.95, 0.01));
    assert!(approx(sample.total_retention_kg_m3, 13.0, 0.01));

    let balance = sample.balance_percent.expect("percentages are present");
    assert!(approx(balance.get(Compound::Chromium), 60.0, 1e-9));
    assert!(approx(balance.sum(), 100.0, 1e-9));

    assert_eq!(metrics.compliance.expected_retention_kg_m3, Some(4.0));
    assert_eq!(metrics.compliance.verdict, Some(Verdict::Approved));
    assert_eq!(metrics.compliance.verdict_text.as_deref(), Some("APROVADO"));
    assert_eq!(metrics.compliance.grade.as_ref().map(|g| g.code), Some(1));
}

#[test]
fn test_pole_sample_certificate() {
    let engine = ReportEngine::default();
    let report = engine.generate(&pole_sample());

    assert_eq!(report.file_name, "LPM-0001.pdf");
    assert!(report.bytes.starts_with(b"%PDF-1.4"));
    assert!(report.bytes.ends_with(b"%%EOF\n"));
    assert!(report.page_count >= 1);
    assert!(report.findings.iter().all(|f| f.level != DqLevel::Error));

    let analysis = engine.analyze(&pole_sample());
    let document = engine.compose(&analysis.display);
    let text = document.plain_text();
    assert!(text.contains("LPM-0001"));
    assert!(text.contains("Serraria Boa Vista Ltda"));
    assert!(text.contains("Viçosa/MG"));
    assert!(text.contains("05/03/2024"));
    assert!(text.contains("APROVADO"));
    assert!(text.contains("13,00"));
    assert!(text.contains("7,80"));
}

#[test]
fn test_generation_is_deterministic() {
    let engine = ReportEngine::default();
    let first = engine.generate(&pole_sample());
    let second = engine.generate(&pole_sample());

    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_blank_record_still_renders() {
    let engine = ReportEngine::default();
    let report = engine.generate(&RawRecord::new());

    assert_eq!(report.file_name, "Relatorio.pdf");
    assert_eq!(report.page_count, 1);
    assert_eq!(report.metrics.sample.total_retention_kg_m3, 0.0);
    assert!(report.metrics.sample.balance_percent.is_none());
    assert!(report.metrics.compliance.verdict.is_none());
    assert!(report
        .findings
        .iter()
        .any(|f| f.level == DqLevel::Error && f.field == "sample_id"));
}

#[test]
fn test_low_retention_is_rejected() {
    let engine = ReportEngine::default();
    let mut raw = pole_sample();
    raw.insert("Cromo (%)", "0.2");
    raw.insert("Cobre (%)", "0.1");
    raw.insert("Arsênio (%)", "0.1");

    let analysis = engine.analyze(&raw);

    assert!(approx(analysis.metrics.sample.total_retention_kg_m3, 2.6, 0.01));
    assert_eq!(analysis.metrics.compliance.verdict, Some(Verdict::Rejected));
    assert_eq!(analysis.display.verdict, "REPROVADO");
}

#[test]
fn test_scaled_percentages_are_corrected() {
    let engine = ReportEngine::default();
    let mut raw = pole_sample();
    raw.insert("Cromo (%)", RawValue::Number(120.0));

    let fields = engine.resolve(&raw);
    let metrics = engine.derive(&fields);

    assert!(approx(metrics.sample.percentages.get(Compound::Chromium), 1.2, 1e-9));
    assert!(approx(metrics.sample.retention_kg_m3.get(Compound::Chromium), 7.8, 0.01));
    assert_eq!(fields.get(CanonicalField::Application), &RawValue::text("Postes"));
}

#[test]
fn test_unknown_application_has_no_verdict() {
    let engine = ReportEngine::default();
    let mut raw = pole_sample();
    raw.insert("Aplicação", "Móveis");

    let analysis = engine.analyze(&raw);

    assert!(analysis.metrics.compliance.verdict.is_none());
    assert_eq!(analysis.display.verdict, "");
    assert!(analysis
        .findings
        .iter()
        .any(|f| f.level == DqLevel::Warning && f.field == "application"));
}

#[test]
fn test_bare_retention_column_fills_expected_retention() {
    let engine = ReportEngine::default();
    let raw = RawRecord::from_pairs([("Aplicação", "Móveis"), ("Retenção", "6,5")]);

    let analysis = engine.analyze(&raw);

    assert!(analysis.metrics.compliance.expected_retention_kg_m3.is_none());
    assert_eq!(analysis.display.expected_retention, "6,50");
}
