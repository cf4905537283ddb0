// ==========================================
// Wood QC Report - Configuration manager
// ==========================================
// Responsibility: assemble EngineConfig from built-in defaults and an optional JSON file
// Lookup: explicit path → $WOOD_QC_CONFIG → <config_dir>/wood-qc-report/config.json → defaults
// ==========================================

use crate::config::field_schema::FieldSchema;
use crate::config::report_profile::ReportProfile;
use crate::config::ruleset::ComplianceRules;
use crate::importer::value_normalizer::NormalizerOptions;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_ENV_VAR: &str = "WOOD_QC_CONFIG";
const CONFIG_DIR_NAME: &str = "wood-qc-report";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ==========================================
// EngineConfig
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entries in a file override the default candidates of the fields they name.
    #[serde(deserialize_with = "deserialize_schema_overrides")]
    pub fields: FieldSchema,
    pub compliance: ComplianceRules,
    pub normalizer: NormalizerOptions,
    pub report: ReportProfile,
}

fn deserialize_schema_overrides<'de, D>(deserializer: D) -> Result<FieldSchema, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = FieldSchema::deserialize(deserializer)?;
    let mut schema = FieldSchema::default_table();
    schema.merge(overrides);
    Ok(schema)
}

impl EngineConfig {
    /// Parse a JSON document; absent sections keep their defaults.
    pub fn from_json_str(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(path, &text)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Resolve the config file location and load it, or fall back to defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match locate_config_file(explicit) {
            Some(path) => Self::load(&path),
            None => {
                debug!("no configuration file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Config file to use, if any.
///
/// An explicit path or the environment variable is returned even when the file
/// is missing, so the read error surfaces to the caller.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}
