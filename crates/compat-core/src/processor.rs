//! Document Processor: walks every feature section of a parsed document and
//! refreshes the derived browser's support data in each record.
use crate::config::InferenceConfig;
use crate::error::{CompatError, RecordSkip};
use crate::merge::{RecordMerger, SupportStatement};
use crate::normalize::normalize;
use crate::walker::TreeWalker;
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of processing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Compatibility records found
    pub records: usize,
    /// Records whose derived support data changed
    pub updated: usize,
    /// Records left alone, with the reason
    pub skipped: Vec<RecordSkip>,
}

impl ProcessReport {
    /// The document changed and must be written back.
    pub fn dirty(&self) -> bool {
        self.updated > 0
    }

    pub fn missing_support(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s, RecordSkip::MissingSupportData { .. }))
            .count()
    }

    pub fn missing_reference(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s, RecordSkip::MissingReferenceData { .. }))
            .count()
    }
}

pub struct DocumentProcessor {
    config: InferenceConfig,
    walker: TreeWalker,
    merger: RecordMerger,
}

impl DocumentProcessor {
    pub fn new(config: InferenceConfig) -> Result<Self, CompatError> {
        config.validate()?;
        let merger = RecordMerger::from_config(&config)?;
        let walker = TreeWalker::new(config.compat_key.clone());
        Ok(Self {
            config,
            walker,
            merger,
        })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Process an owned document and hand it back with its report.
    pub fn process(&self, mut document: Value) -> Result<(Value, ProcessReport), CompatError> {
        let report = self.process_in_place(&mut document)?;
        Ok((document, report))
    }

    pub fn process_in_place(&self, document: &mut Value) -> Result<ProcessReport, CompatError> {
        let sections = match document {
            Value::Object(sections) => sections,
            other => {
                return Err(CompatError::MalformedDocument(format!(
                    "expected an object of sections, found {}",
                    json_kind(other)
                )))
            }
        };

        let mut report = ProcessReport::default();
        for (name, section) in sections.iter_mut() {
            // The browser registry does not contain compat info
            if *name == self.config.registry_section {
                continue;
            }
            self.walker.walk(section, name, &mut |feature: &str, record: &mut Value| {
                self.visit_record(feature, record, &mut report)
            });
        }

        Ok(report)
    }

    fn visit_record(&self, feature: &str, record: &mut Value, report: &mut ProcessReport) {
        debug!(feature, "found compat record");
        report.records += 1;

        match self.update_record(feature, record) {
            Ok(true) => report.updated += 1,
            Ok(false) => {}
            Err(skip) => {
                warn!(feature, "{}", skip);
                report.skipped.push(skip);
            }
        }
    }

    /// Merge the derived entry into `record` and re-sort its support map.
    /// Returns whether the derived entry changed.
    fn update_record(&self, feature: &str, record: &mut Value) -> Result<bool, RecordSkip> {
        let reference_key = &self.config.reference_browser;
        let derived_key = &self.config.derived_browser;

        let support = match record.get_mut("support") {
            Some(Value::Object(support)) => support,
            _ => {
                return Err(RecordSkip::MissingSupportData {
                    feature: feature.to_string(),
                })
            }
        };

        let reference = support
            .get(reference_key)
            .filter(|value| !value.is_null())
            .ok_or_else(|| RecordSkip::MissingReferenceData {
                feature: feature.to_string(),
                browser: reference_key.clone(),
            })?;
        let reference =
            SupportStatement::from_value(reference).ok_or_else(|| RecordSkip::UnreadableSupport {
                feature: feature.to_string(),
                browser: reference_key.clone(),
            })?;

        let outcome = self.merger.merge(feature, &reference, support.get(derived_key));

        let mut updated = std::mem::take(support);
        updated.insert(derived_key.clone(), outcome.value);
        let (normalized, reordered) = normalize(updated);
        if reordered {
            debug!(feature, "support keys reordered");
        }
        *support = normalized;

        Ok(outcome.changed)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
