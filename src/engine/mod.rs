// ==========================================
// Wood QC Report - Engine layer
// ==========================================
// Responsibility: metrics, compliance and report orchestration
// Red line: no I/O inside the computation; results are pure functions of the input
// ==========================================

pub mod compliance;
pub mod display;
pub mod metrics;
pub mod orchestrator;

pub use compliance::ComplianceEvaluator;
pub use display::{CompoundRow, DisplayRecord, PhysicalSummary};
pub use metrics::{MetricsCalculator, MetricsInput};
pub use orchestrator::{GeneratedReport, ReportEngine, SampleAnalysis};
