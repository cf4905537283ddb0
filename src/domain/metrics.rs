// ==========================================
// Wood QC Report - Derived metrics
// ==========================================
// Invariant: DerivedMetrics is a pure function of the CanonicalRecord
// ==========================================

use crate::domain::types::CompoundSet;
use serde::Serialize;
use std::fmt;

// ==========================================
// SampleMetrics - physical and chemical results
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleMetrics {
    // ===== Physical =====
    pub avg_diameter_cm: f64,
    pub avg_length_cm: f64,
    pub avg_mass_g: f64,
    pub volume_cm3: f64,
    pub density_g_cm3: f64,
    pub density_kg_m3: f64,

    // ===== Chemical =====
    pub percentages: CompoundSet<f64>,      // normalized input percentages
    pub retention_kg_m3: CompoundSet<f64>,  // per-compound retention
    pub balance_percent: Option<CompoundSet<f64>>, // unset when the percentages sum to zero
    pub total_retention_kg_m3: f64,
}

// ==========================================
// Verdict
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Approved => write!(f, "approved"),
            Verdict::Rejected => write!(f, "rejected"),
        }
    }
}

/// Short and long penetration description for a grade code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeDescription {
    pub code: u8,
    pub short: String,
    pub long: String,
}

// ==========================================
// ComplianceOutcome
// ==========================================
// verdict/verdict_text stay None when the application matched no threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplianceOutcome {
    pub expected_retention_kg_m3: Option<f64>,
    pub verdict: Option<Verdict>,
    pub verdict_text: Option<String>,
    pub grade: Option<GradeDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub sample: SampleMetrics,
    pub compliance: ComplianceOutcome,
}
