// ==========================================
// Wood QC Report - Canonical fields
// ==========================================
// Responsibility: the fixed set of semantic inputs the engine understands,
// and the record holding their resolved values
// ==========================================

use crate::domain::record::{RawValue, EMPTY_VALUE};
use crate::domain::types::Compound;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Replicate readings taken per sample for diameter, length and mass.
pub const REPLICATES: u8 = 5;

// ==========================================
// CanonicalField
// ==========================================
// Keys serialize as snake_case strings ("entry_date", "diameter_3",
// "chromium_percent") so the schema table can live in a JSON config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CanonicalField {
    EntryDate,
    IssueDate,
    SampleId,
    ClientName,
    City,
    State,
    Email,
    ClientReference,
    Wood,
    Product,
    Application,
    Standard,
    DeclaredRetention,
    Diameter(u8),
    Length(u8),
    Mass(u8),
    CompoundPercent(Compound),
    Grade,
    GradeType,
    PenetrationDescription,
    Observation,
}

const SIMPLE_FIELDS: &[(CanonicalField, &str)] = &[
    (CanonicalField::EntryDate, "entry_date"),
    (CanonicalField::IssueDate, "issue_date"),
    (CanonicalField::SampleId, "sample_id"),
    (CanonicalField::ClientName, "client_name"),
    (CanonicalField::City, "city"),
    (CanonicalField::State, "state"),
    (CanonicalField::Email, "email"),
    (CanonicalField::ClientReference, "client_reference"),
    (CanonicalField::Wood, "wood"),
    (CanonicalField::Product, "product"),
    (CanonicalField::Application, "application"),
    (CanonicalField::Standard, "standard"),
    (CanonicalField::DeclaredRetention, "declared_retention"),
    (CanonicalField::Grade, "grade"),
    (CanonicalField::GradeType, "grade_type"),
    (CanonicalField::PenetrationDescription, "penetration_description"),
    (CanonicalField::Observation, "observation"),
];

impl CanonicalField {
    /// Every canonical field, replicates expanded.
    pub fn all() -> Vec<CanonicalField> {
        let mut fields: Vec<CanonicalField> = SIMPLE_FIELDS.iter().map(|(f, _)| *f).collect();
        for i in 1..=REPLICATES {
            fields.push(CanonicalField::Diameter(i));
            fields.push(CanonicalField::Length(i));
            fields.push(CanonicalField::Mass(i));
        }
        fields.extend(Compound::ALL.iter().map(|c| CanonicalField::CompoundPercent(*c)));
        fields.sort();
        fields
    }

    pub fn key(&self) -> String {
        match self {
            CanonicalField::Diameter(i) => format!("diameter_{}", i),
            CanonicalField::Length(i) => format!("length_{}", i),
            CanonicalField::Mass(i) => format!("mass_{}", i),
            CanonicalField::CompoundPercent(c) => format!("{}_percent", c),
            simple => SIMPLE_FIELDS
                .iter()
                .find(|(f, _)| f == simple)
                .map(|(_, k)| k.to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some((_, field)) = SIMPLE_FIELDS.iter().map(|(f, k)| (*k, *f)).find(|(k, _)| *k == key) {
            return Ok(field);
        }
        if let Some(compound) = key.strip_suffix("_percent") {
            return Compound::ALL
                .iter()
                .find(|c| c.to_string() == compound)
                .map(|c| CanonicalField::CompoundPercent(*c))
                .ok_or_else(|| format!("unknown compound in field key: {}", key));
        }
        let replicate = |prefix: &str| -> Option<u8> {
            key.strip_prefix(prefix)
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=REPLICATES).contains(n))
        };
        if let Some(i) = replicate("diameter_") {
            return Ok(CanonicalField::Diameter(i));
        }
        if let Some(i) = replicate("length_") {
            return Ok(CanonicalField::Length(i));
        }
        if let Some(i) = replicate("mass_") {
            return Ok(CanonicalField::Mass(i));
        }
        Err(format!("unknown canonical field: {}", key))
    }
}

impl TryFrom<String> for CanonicalField {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CanonicalField> for String {
    fn from(field: CanonicalField) -> Self {
        field.key()
    }
}

// ==========================================
// CanonicalRecord - resolved values per canonical field
// ==========================================
// Absent fields read as RawValue::Empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalRecord {
    values: BTreeMap<CanonicalField, RawValue>,
}

impl CanonicalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: CanonicalField, value: RawValue) {
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }

    pub fn with(mut self, field: CanonicalField, value: impl Into<RawValue>) -> Self {
        self.set(field, value.into());
        self
    }

    pub fn get(&self, field: CanonicalField) -> &RawValue {
        self.values.get(&field).unwrap_or(&EMPTY_VALUE)
    }

    /// Trimmed text of a field, empty string when absent.
    pub fn text(&self, field: CanonicalField) -> String {
        self.get(field).as_text()
    }

    pub fn is_present(&self, field: CanonicalField) -> bool {
        !self.get(field).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &RawValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys_round_trip() {
        for field in CanonicalField::all() {
            let parsed: CanonicalField = field.key().parse().unwrap();
            assert_eq!(parsed, field);
        }
    }

    #[test]
    fn test_field_key_examples() {
        assert_eq!(CanonicalField::Diameter(3).key(), "diameter_3");
        assert_eq!(
            CanonicalField::CompoundPercent(Compound::Arsenic).key(),
            "arsenic_percent"
        );
        assert!("diameter_6".parse::<CanonicalField>().is_err());
        assert!("colour".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn test_all_fields_count() {
        // 17 simple + 15 replicates + 3 compounds
        assert_eq!(CanonicalField::all().len(), 35);
    }

    #[test]
    fn test_canonical_record_absent_reads_empty() {
        let record = CanonicalRecord::new().with(CanonicalField::Wood, "Eucalipto");
        assert_eq!(record.text(CanonicalField::Wood), "Eucalipto");
        assert_eq!(record.text(CanonicalField::Product), "");
        assert!(!record.is_present(CanonicalField::Product));
    }

    #[test]
    fn test_serialized_keys_are_strings() {
        let record = CanonicalRecord::new().with(CanonicalField::Mass(2), 127.5);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["values"]["mass_2"], serde_json::json!(127.5));
    }
}
