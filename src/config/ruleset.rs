// ==========================================
// Wood QC Report - Compliance ruleset
// ==========================================
// Responsibility: versionable static tables injected into the compliance evaluator
// - application keyword → minimum total retention (kg/m³)
// - grade code → penetration description pair
// - normative balance ranges printed in the reference-standard column
// ==========================================

use crate::domain::CompoundSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionThreshold {
    pub keyword: String,
    pub min_retention_kg_m3: f64,
}

impl RetentionThreshold {
    pub fn new(keyword: &str, min_retention_kg_m3: f64) -> Self {
        Self {
            keyword: keyword.to_string(),
            min_retention_kg_m3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub code: u8,
    pub short: String,
    pub long: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormativeRange {
    pub min_percent: f64,
    pub max_percent: f64,
}

impl NormativeRange {
    pub const fn new(min_percent: f64, max_percent: f64) -> Self {
        Self {
            min_percent,
            max_percent,
        }
    }
}

// ==========================================
// ComplianceRules
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceRules {
    /// Matched in order; first keyword contained in the application text wins.
    pub thresholds: Vec<RetentionThreshold>,
    pub grades: Vec<GradeEntry>,
    pub normative_ranges: CompoundSet<NormativeRange>,
    pub approved_text: String,
    pub rejected_text: String,
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            thresholds: vec![
                RetentionThreshold::new("poste", 4.0),
                RetentionThreshold::new("cruzeta", 9.6),
                RetentionThreshold::new("dormente", 9.6),
                RetentionThreshold::new("mour", 6.5),
                RetentionThreshold::new("estaca", 9.6),
                RetentionThreshold::new("contato com o solo", 6.5),
                RetentionThreshold::new("construção", 4.0),
                RetentionThreshold::new("construcao", 4.0),
                RetentionThreshold::new("madeira serrada", 4.0),
            ],
            grades: default_grades(),
            normative_ranges: CompoundSet::new(
                NormativeRange::new(41.8, 53.2),
                NormativeRange::new(15.2, 22.8),
                NormativeRange::new(27.3, 40.7),
            ),
            approved_text: "APROVADO".to_string(),
            rejected_text: "REPROVADO".to_string(),
        }
    }
}

fn default_grades() -> Vec<GradeEntry> {
    let table: [(u8, &str, &str); 5] = [
        (
            1,
            "Total",
            "Penetração total: o preservativo atingiu todo o alburno da amostra.",
        ),
        (
            2,
            "Parcial periférica",
            "Penetração parcial periférica: o preservativo formou um anel contínuo na periferia do alburno, sem atingi-lo por completo.",
        ),
        (
            3,
            "Parcial irregular",
            "Penetração parcial irregular: o preservativo distribuiu-se de forma descontínua no alburno, com regiões não tratadas.",
        ),
        (
            4,
            "Vascular",
            "Penetração vascular: o preservativo ficou restrito aos vasos, sem difusão para os tecidos vizinhos.",
        ),
        (
            5,
            "Nula",
            "Penetração nula: não foi detectada a presença do preservativo na amostra.",
        ),
    ];

    table
        .iter()
        .map(|(code, short, long)| GradeEntry {
            code: *code,
            short: short.to_string(),
            long: long.to_string(),
        })
        .collect()
}

impl ComplianceRules {
    /// First threshold whose keyword occurs (case-insensitively) in the application text.
    pub fn threshold_for(&self, application: &str) -> Option<&RetentionThreshold> {
        let application = application.trim().to_lowercase();
        if application.is_empty() {
            return None;
        }
        self.thresholds
            .iter()
            .find(|t| !t.keyword.is_empty() && application.contains(&t.keyword.to_lowercase()))
    }

    pub fn grade(&self, code: u8) -> Option<&GradeEntry> {
        self.grades.iter().find(|g| g.code == code)
    }
}
