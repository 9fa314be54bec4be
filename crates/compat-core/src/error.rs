//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompatError {
    /// The parsed input is not a JSON object keyed by section name.
    #[error("DOCUMENT/{0}")]
    MalformedDocument(String),

    #[error("MAPPING/{0}")]
    InvalidMapping(String),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("PATTERN/{0}")]
    Pattern(#[from] regex::Error),
}

/// Why a single compatibility record was left alone.
///
/// These never abort a document; they are counted in the
/// [`ProcessReport`](crate::processor::ProcessReport) and logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordSkip {
    #[error("SUPPORT/{feature}: compat does not have support")]
    MissingSupportData { feature: String },

    #[error("REFERENCE/{feature}: {browser} info is not defined, cannot infer data")]
    MissingReferenceData { feature: String, browser: String },

    #[error("SUPPORT/{feature}: {browser} entry is neither an object nor an array of objects")]
    UnreadableSupport { feature: String, browser: String },
}
