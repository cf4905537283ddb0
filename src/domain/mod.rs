// ==========================================
// Wood QC Report - Domain layer
// ==========================================
// Responsibility: record, field, metric and finding types
// Red line: no parsing, no arithmetic, no drawing
// ==========================================

pub mod fields;
pub mod metrics;
pub mod quality;
pub mod record;
pub mod types;

pub use fields::{CanonicalField, CanonicalRecord, REPLICATES};
pub use metrics::{ComplianceOutcome, DerivedMetrics, GradeDescription, SampleMetrics, Verdict};
pub use quality::{DqFinding, DqLevel};
pub use record::{RawRecord, RawValue};
pub use types::{Compound, CompoundSet, DateLayout, FormulaPart};
