// ==========================================
// Wood QC Report - Compliance evaluator
// ==========================================
// Responsibility: application → expected retention, grade → description, pass/fail
// Rules are injected; the evaluator holds no tables of its own.
// Boundary: total equal to the threshold passes.
// ==========================================

use crate::config::ComplianceRules;
use crate::domain::{ComplianceOutcome, GradeDescription, Verdict};
use tracing::debug;

/// Absorbs floating-point noise in the summed retentions.
const RETENTION_EPSILON: f64 = 1e-9;

pub struct ComplianceEvaluator<'a> {
    rules: &'a ComplianceRules,
}

impl<'a> ComplianceEvaluator<'a> {
    pub fn new(rules: &'a ComplianceRules) -> Self {
        Self { rules }
    }

    pub fn expected_retention(&self, application: &str) -> Option<f64> {
        self.rules
            .threshold_for(application)
            .map(|t| t.min_retention_kg_m3)
    }

    pub fn verdict(&self, total_retention_kg_m3: f64, threshold_kg_m3: f64) -> Verdict {
        if total_retention_kg_m3 + RETENTION_EPSILON >= threshold_kg_m3 {
            Verdict::Approved
        } else {
            Verdict::Rejected
        }
    }

    pub fn verdict_text(&self, verdict: Verdict) -> &str {
        match verdict {
            Verdict::Approved => &self.rules.approved_text,
            Verdict::Rejected => &self.rules.rejected_text,
        }
    }

    pub fn describe_grade(&self, code: u8) -> Option<GradeDescription> {
        self.rules.grade(code).map(|entry| GradeDescription {
            code: entry.code,
            short: entry.short.clone(),
            long: entry.long.clone(),
        })
    }

    /// No application match → no verdict at all.
    pub fn evaluate(&self, application: &str, total_retention_kg_m3: f64, grade: Option<u8>) -> ComplianceOutcome {
        let expected = self.expected_retention(application);
        let verdict = expected.map(|threshold| self.verdict(total_retention_kg_m3, threshold));
        if expected.is_none() {
            debug!(application = %application, "no retention threshold matched");
        }

        ComplianceOutcome {
            expected_retention_kg_m3: expected,
            verdict,
            verdict_text: verdict.map(|v| self.verdict_text(v).to_string()),
            grade: grade.and_then(|code| self.describe_grade(code)),
        }
    }
}
