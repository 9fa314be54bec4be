//! Version tokens and the reference → derived release mapping.
//!
//! A `version_added`/`version_removed` field holds a number, a string, a
//! boolean or null, and each carries a different meaning. [`VersionToken`]
//! names those meanings once so callers never re-derive truthiness rules.

use crate::error::CompatError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Prefix used by the corpus for "at or before this version" ranges.
const RANGE_MARKER: char = '≤';

#[derive(Debug, Clone, PartialEq)]
pub enum VersionToken {
    /// `null`: support status not known
    Unknown,
    /// `false`: never shipped (or not yet determinable)
    NeverAdded,
    /// `true`: shipped since the first tracked release
    SinceOrigin,
    /// A concrete release, e.g. `56` or `"6.0"`
    Release(String),
}

impl VersionToken {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Self::SinceOrigin,
            Value::Bool(false) => Self::NeverAdded,
            Value::Number(n) => Self::Release(n.to_string()),
            Value::String(s) => Self::Release(s.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Unknown,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Unknown => Value::Null,
            Self::NeverAdded => Value::Bool(false),
            Self::SinceOrigin => Value::Bool(true),
            Self::Release(v) => Value::String(v.clone()),
        }
    }

    /// Numeric value of a release, ignoring a leading range marker.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Release(v) => v
                .trim()
                .trim_start_matches(RANGE_MARKER)
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// A concrete release the derived browser can be said to have shipped in.
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Release(v) if !v.is_empty())
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "null"),
            Self::NeverAdded => write!(f, "false"),
            Self::SinceOrigin => write!(f, "true"),
            Self::Release(v) => write!(f, "{}", v),
        }
    }
}

/// One row of the mapping table: derived release `derived` shipped reference
/// engine behaviour up to and including `max_reference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub derived: String,
    pub max_reference: f64,
}

impl MappingEntry {
    pub fn new(derived: impl Into<String>, max_reference: f64) -> Self {
        Self {
            derived: derived.into(),
            max_reference,
        }
    }
}

/// Maps reference-browser versions to derived-browser releases.
#[derive(Debug, Clone)]
pub struct VersionMapper {
    table: Vec<MappingEntry>,
}

impl VersionMapper {
    /// Build a mapper; the table must be non-empty and strictly increasing
    /// in `max_reference`.
    pub fn new(table: Vec<MappingEntry>) -> Result<Self, CompatError> {
        if table.is_empty() {
            return Err(CompatError::InvalidMapping("mapping table is empty".to_string()));
        }
        for entry in &table {
            if !entry.max_reference.is_finite() {
                return Err(CompatError::InvalidMapping(format!(
                    "release {} has a non-finite reference version",
                    entry.derived
                )));
            }
        }
        for pair in table.windows(2) {
            if pair[1].max_reference <= pair[0].max_reference {
                return Err(CompatError::InvalidMapping(format!(
                    "release {} ({}) does not follow release {} ({})",
                    pair[1].derived, pair[1].max_reference, pair[0].derived, pair[0].max_reference
                )));
            }
        }
        Ok(Self { table })
    }

    pub fn table(&self) -> &[MappingEntry] {
        &self.table
    }

    /// Oldest reference version covered by the table.
    pub fn floor(&self) -> f64 {
        self.table[0].max_reference
    }

    pub fn map(&self, reference: &VersionToken) -> VersionToken {
        let version = match reference {
            VersionToken::Unknown => return VersionToken::Unknown,
            VersionToken::NeverAdded => return VersionToken::NeverAdded,
            VersionToken::SinceOrigin => return VersionToken::SinceOrigin,
            VersionToken::Release(_) => match reference.numeric() {
                Some(v) => v,
                None => return VersionToken::NeverAdded,
            },
        };

        if version < self.floor() {
            return VersionToken::SinceOrigin;
        }

        self.table
            .iter()
            .find(|entry| version <= entry.max_reference)
            .map(|entry| VersionToken::Release(entry.derived.clone()))
            .unwrap_or(VersionToken::NeverAdded)
    }

    /// [`map`](Self::map) on raw JSON.
    pub fn map_value(&self, reference: &Value) -> Value {
        self.map(&VersionToken::from_value(reference)).to_value()
    }
}
