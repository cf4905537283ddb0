// ==========================================
// Wood QC Report - Configuration layer
// ==========================================
// Responsibility: schema-mapping table, compliance tables, report texts
// Storage: built-in defaults, optionally overridden by a JSON file
// ==========================================

pub mod config_manager;
pub mod field_schema;
pub mod report_profile;
pub mod ruleset;

pub use config_manager::{locate_config_file, ConfigError, EngineConfig, CONFIG_ENV_VAR};
pub use field_schema::FieldSchema;
pub use report_profile::{LogoPlacement, ReportProfile};
pub use ruleset::{ComplianceRules, GradeEntry, NormativeRange, RetentionThreshold};
