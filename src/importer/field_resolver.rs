// ==========================================
// Wood QC Report - Field resolver
// ==========================================
// Responsibility: raw column name → canonical field
// Rules:
// 1. exact match on the normalized key (trimmed, case-folded), candidates in priority order
// 2. otherwise the first record key containing a candidate, keys in insertion order
//    ("=Name" candidates take part in the exact pass only)
// Both passes skip empty values. No match resolves to Empty; never fails.
// ==========================================

use crate::config::FieldSchema;
use crate::domain::record::EMPTY_VALUE;
use crate::domain::{CanonicalRecord, RawRecord, RawValue};
use tracing::debug;

/// Prefix marking a candidate that must match a column name exactly.
pub const EXACT_ONLY_PREFIX: char = '=';

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Normalized candidate text and whether it may match by substring.
fn normalize_candidate(candidate: &str) -> (String, bool) {
    let trimmed = candidate.trim();
    match trimmed.strip_prefix(EXACT_ONLY_PREFIX) {
        Some(rest) => (normalize_key(rest), false),
        None => (normalize_key(trimmed), true),
    }
}

/// Record keys normalized once, in insertion order.
struct NormalizedKeys<'r> {
    entries: Vec<(String, &'r RawValue)>,
}

impl<'r> NormalizedKeys<'r> {
    fn new(record: &'r RawRecord) -> Self {
        Self {
            entries: record
                .iter()
                .map(|(k, v)| (normalize_key(k), v))
                .collect(),
        }
    }

    fn lookup<S: AsRef<str>>(&self, candidates: &[S]) -> &'r RawValue {
        let candidates: Vec<(String, bool)> = candidates
            .iter()
            .map(|c| normalize_candidate(c.as_ref()))
            .filter(|(c, _)| !c.is_empty())
            .collect();

        for (candidate, _) in &candidates {
            let exact = self
                .entries
                .iter()
                .find(|(key, value)| key == candidate && !value.is_empty());
            if let Some((_, value)) = exact {
                return *value;
            }
        }

        for candidate in candidates.iter().filter(|(_, partial)| *partial).map(|(c, _)| c) {
            let partial = self
                .entries
                .iter()
                .find(|(key, value)| key.contains(candidate.as_str()) && !value.is_empty());
            if let Some((_, value)) = partial {
                return *value;
            }
        }

        &EMPTY_VALUE
    }
}

/// Resolve one field from an ordered candidate list.
pub fn resolve<'r, S: AsRef<str>>(record: &'r RawRecord, candidates: &[S]) -> &'r RawValue {
    NormalizedKeys::new(record).lookup(candidates)
}

/// Same as [`resolve`], as trimmed text ("" when unmatched).
pub fn resolve_text<S: AsRef<str>>(record: &RawRecord, candidates: &[S]) -> String {
    resolve(record, candidates).as_text()
}

// ==========================================
// FieldResolver - whole-record resolution against a schema
// ==========================================
pub struct FieldResolver<'a> {
    schema: &'a FieldSchema,
}

impl<'a> FieldResolver<'a> {
    pub fn new(schema: &'a FieldSchema) -> Self {
        Self { schema }
    }

    pub fn resolve_all(&self, record: &RawRecord) -> CanonicalRecord {
        let keys = NormalizedKeys::new(record);
        let mut resolved = CanonicalRecord::new();

        for field in self.schema.fields() {
            let value = keys.lookup(self.schema.candidates(field));
            if value.is_empty() {
                debug!(field = %field, "field unresolved");
                continue;
            }
            resolved.set(field, value.clone());
        }

        resolved
    }
}
