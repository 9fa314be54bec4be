//! Record merging: derive one browser's support statement from another's.
//!
//! # Field policy
//!
//! For every field of the reference entry (except `flags`) the derived value
//! is replaced only when it carries no information yet:
//! - the derived field is missing, falsy or exactly `true`
//! - the field is a version field and the reference version is ancient
//!
//! Flag-gated reference data is never promoted, and a release range that
//! starts and ends in the same derived release collapses to "never added".

use crate::config::InferenceConfig;
use crate::error::CompatError;
use crate::notes::NoteRewriter;
use crate::version::{VersionMapper, VersionToken};
use serde_json::{Map, Value};
use tracing::debug;

/// One browser's support entry, field order preserved.
pub type SupportEntry = Map<String, Value>;

const FLAGS: &str = "flags";
const NOTES: &str = "notes";
const VERSION_ADDED: &str = "version_added";
const VERSION_REMOVED: &str = "version_removed";

/// A browser's support data: a single entry or several release ranges.
#[derive(Debug, Clone, PartialEq)]
pub enum SupportStatement {
    Single(SupportEntry),
    Multiple(Vec<SupportEntry>),
}

impl SupportStatement {
    /// `None` unless the value is an object or an array of objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(entry) => Some(Self::Single(entry.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_object().cloned())
                .collect::<Option<Vec<_>>>()
                .map(Self::Multiple),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Single(entry) => Value::Object(entry),
            Self::Multiple(entries) => Value::Array(entries.into_iter().map(Value::Object).collect()),
        }
    }
}

/// JavaScript truthiness, which the corpus conventions are written against.
/// Empty arrays and objects are truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn has_flags(entry: &SupportEntry) -> bool {
    entry.get(FLAGS).map_or(false, is_truthy)
}

fn never_added() -> SupportEntry {
    let mut entry = Map::new();
    entry.insert(VERSION_ADDED.to_string(), Value::Bool(false));
    entry
}

/// Added and removed in the same release is indistinguishable from never
/// having shipped.
fn collapse_same_release(entry: &mut SupportEntry) {
    let same_release = match (entry.get(VERSION_ADDED), entry.get(VERSION_REMOVED)) {
        (Some(added), Some(removed)) => is_truthy(added) && added == removed,
        _ => false,
    };
    if same_release {
        entry.retain(|field, _| field != VERSION_REMOVED);
        entry.insert(VERSION_ADDED.to_string(), Value::Bool(false));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub value: Value,
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct RecordMerger {
    mapper: VersionMapper,
    notes: NoteRewriter,
    ancient_threshold: f64,
}

impl RecordMerger {
    pub fn new(mapper: VersionMapper, notes: NoteRewriter, ancient_threshold: f64) -> Self {
        Self {
            mapper,
            notes,
            ancient_threshold,
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self, CompatError> {
        let mapper = config.mapper()?;
        let notes = NoteRewriter::new(
            mapper.clone(),
            config.reference_display_name.clone(),
            config.derived_display_name.clone(),
        )?;
        Ok(Self::new(mapper, notes, config.ancient_version_threshold))
    }

    pub fn mapper(&self) -> &VersionMapper {
        &self.mapper
    }

    /// Compute the derived support value for `feature`. `existing` is the
    /// derived browser's current value, if any. The input is never mutated.
    pub fn merge(
        &self,
        feature: &str,
        reference: &SupportStatement,
        existing: Option<&Value>,
    ) -> MergeOutcome {
        let value = match reference {
            SupportStatement::Single(entry) => {
                Value::Object(self.merge_entry(feature, entry, existing.and_then(Value::as_object)))
            }
            SupportStatement::Multiple(entries) => self.merge_ranges(feature, entries, existing),
        };

        let changed = existing != Some(&value);
        MergeOutcome { value, changed }
    }

    fn merge_ranges(
        &self,
        feature: &str,
        entries: &[SupportEntry],
        existing: Option<&Value>,
    ) -> Value {
        let kept: Vec<&SupportEntry> = entries
            .iter()
            .filter(|entry| !has_flags(entry) && !self.collapses_when_mapped(entry))
            .collect();

        match kept.as_slice() {
            [] => {
                debug!(feature, "no unflagged release range left");
                Value::Object(never_added())
            }
            [only] => Value::Object(self.merge_entry(feature, only, existing.and_then(Value::as_object))),
            _ => match existing {
                Some(Value::Array(prior)) if prior.len() == kept.len() => {
                    debug!(feature, ranges = kept.len(), "merging release ranges by position");
                    let merged = kept
                        .iter()
                        .zip(prior)
                        .map(|(entry, prior)| {
                            Value::Object(self.merge_entry(feature, entry, prior.as_object()))
                        })
                        .collect();
                    Value::Array(merged)
                }
                _ => {
                    debug!(feature, ranges = kept.len(), "data is an array, overwriting");
                    let rebuilt = kept
                        .iter()
                        .map(|entry| Value::Object(self.merge_entry(feature, entry, None)))
                        .collect();
                    Value::Array(rebuilt)
                }
            },
        }
    }

    /// A range whose start and end land in the same derived release.
    fn collapses_when_mapped(&self, entry: &SupportEntry) -> bool {
        match (entry.get(VERSION_ADDED), entry.get(VERSION_REMOVED)) {
            (Some(added), Some(removed)) if !removed.is_null() => {
                self.mapper.map_value(added) == self.mapper.map_value(removed)
            }
            _ => false,
        }
    }

    fn merge_entry(
        &self,
        feature: &str,
        reference: &SupportEntry,
        existing: Option<&SupportEntry>,
    ) -> SupportEntry {
        if has_flags(reference) {
            debug!(feature, "behind a flag, not promoting");
            return never_added();
        }

        let mut data = existing.cloned().unwrap_or_default();

        for (field, value) in reference {
            if field == FLAGS || !self.should_overwrite(field, value, data.get(field)) {
                continue;
            }

            let derived = match field.as_str() {
                VERSION_ADDED | VERSION_REMOVED => self.mapper.map_value(value),
                NOTES => match self.notes.rewrite_field(value) {
                    Some(notes) => notes,
                    None => {
                        debug!(feature, "note is specific to the reference browser, not copied");
                        continue;
                    }
                },
                _ => value.clone(),
            };

            debug!(feature, field = %field, reference = %value, derived = %derived, "updating derived field");
            data.insert(field.clone(), derived);
        }

        collapse_same_release(&mut data);
        data
    }

    fn should_overwrite(&self, field: &str, reference: &Value, current: Option<&Value>) -> bool {
        match current {
            None => true,
            Some(Value::Bool(true)) => true,
            Some(value) if !is_truthy(value) => true,
            Some(_) => {
                field.starts_with("version")
                    && VersionToken::from_value(reference)
                        .numeric()
                        .map_or(false, |v| v <= self.ancient_threshold)
            }
        }
    }
}
