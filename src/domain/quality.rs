// ==========================================
// Wood QC Report - Data-quality findings
// ==========================================
// Findings never block report generation; they point a reviewer
// at the fields that rendered blank or degenerate.
// ==========================================

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,   // required identification missing
    Warning, // result degenerated to zero / no verdict
    Info,    // optional input missing
}

impl fmt::Display for DqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqLevel::Error => write!(f, "ERROR"),
            DqLevel::Warning => write!(f, "WARNING"),
            DqLevel::Info => write!(f, "INFO"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DqFinding {
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

impl DqFinding {
    pub fn new(level: DqLevel, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            field: field.into(),
            message: message.into(),
        }
    }
}
