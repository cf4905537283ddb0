// ==========================================
// Wood QC Report - Core library
// ==========================================
// Scope: treated-wood retention analysis and certificate generation
// Pipeline: field resolution → value normalization → metrics →
//           compliance → paginated PDF certificate
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - records and derived types
pub mod domain;

// Configuration layer - schema, rules, report texts
pub mod config;

// Import layer - record sources, resolution, normalization
pub mod importer;

// Engine layer - metrics, compliance, orchestration
pub mod engine;

// Report layer - page composition and PDF output
pub mod report;

// Archive - output file naming and placement
pub mod archive;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    CanonicalField, CanonicalRecord, Compound, CompoundSet, ComplianceOutcome, DerivedMetrics, DqFinding, DqLevel,
    RawRecord, RawValue, SampleMetrics, Verdict,
};

pub use config::{ComplianceRules, EngineConfig, FieldSchema, ReportProfile};

pub use importer::{FieldResolver, RecordLoader, RecordSelector, UniversalFileParser, ValueNormalizer};

pub use engine::{
    ComplianceEvaluator, DisplayRecord, GeneratedReport, MetricsCalculator, ReportEngine, SampleAnalysis,
};

pub use report::{compose_certificate, ReportDocument};

pub use archive::{archive_document, report_file_name, ArchiveError};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Wood QC Report";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
