//! Inference configuration: browser pair, sentinel names and the mapping table.
//!
//! The defaults reproduce the Chrome for Android → Samsung Internet setup.
//! A YAML file can override any field:
//!
//! ```yaml
//! reference_browser: chrome_android
//! derived_browser: samsunginternet_android
//! mappings:
//!   - { derived: "6.0", max_reference: 56 }
//!   - { derived: "7.0", max_reference: 59 }
//! ```

use crate::error::CompatError;
use crate::version::{MappingEntry, VersionMapper};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Support-map key of the browser treated as ground truth
    pub reference_browser: String,
    /// Support-map key of the browser being computed
    pub derived_browser: String,
    /// Name of the reference browser as it appears in note text
    pub reference_display_name: String,
    /// Name written into rewritten notes
    pub derived_display_name: String,
    /// Top-level section that holds the browser registry, not features
    pub registry_section: String,
    /// Key under which a feature node stores its compatibility record
    pub compat_key: String,
    /// Reference versions at or below this are treated as "always supported"
    /// and always overwrite the derived value.
    pub ancient_version_threshold: f64,
    pub mappings: Vec<MappingEntry>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            reference_browser: "chrome_android".to_string(),
            derived_browser: "samsunginternet_android".to_string(),
            reference_display_name: "Chrome".to_string(),
            derived_display_name: "Samsung Internet".to_string(),
            registry_section: "browsers".to_string(),
            compat_key: "__compat".to_string(),
            ancient_version_threshold: 4.0,
            mappings: default_mappings(),
        }
    }
}

/// Samsung Internet releases and the newest Chrome engine each one shipped.
pub fn default_mappings() -> Vec<MappingEntry> {
    [
        ("4.0", 44.0),
        ("5.0", 51.0),
        ("6.0", 56.0),
        ("7.0", 59.0),
        ("8.0", 63.0),
        ("9.0", 67.0),
        ("10.0", 71.0),
    ]
    .into_iter()
    .map(|(derived, max_reference)| MappingEntry::new(derived, max_reference))
    .collect()
}

impl InferenceConfig {
    /// Load a YAML config file. Missing fields fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CompatError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompatError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, CompatError> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| CompatError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Same browser pair and names, different mapping table.
    pub fn with_mappings(mut self, mappings: Vec<MappingEntry>) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn validate(&self) -> Result<(), CompatError> {
        if self.reference_browser == self.derived_browser {
            return Err(CompatError::Config(format!(
                "reference and derived browser are both '{}'",
                self.reference_browser
            )));
        }
        if self.compat_key.is_empty() {
            return Err(CompatError::Config("compat_key must not be empty".to_string()));
        }
        VersionMapper::new(self.mappings.clone()).map(|_| ())
    }

    pub fn mapper(&self) -> Result<VersionMapper, CompatError> {
        VersionMapper::new(self.mappings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = InferenceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mappings.len(), 7);
        assert_eq!(config.mappings[0].max_reference, 44.0);
    }

    #[test]
    fn test_yaml_overrides_mappings_only() {
        let config = InferenceConfig::from_yaml(
            "mappings:\n  - { derived: \"6\", max_reference: 56 }\n  - { derived: \"7\", max_reference: 59 }\n",
        )
        .unwrap();

        assert_eq!(config.reference_browser, "chrome_android");
        assert_eq!(config.mappings.len(), 2);
        assert_eq!(config.mappings[1].derived, "7");
    }

    #[test]
    fn test_yaml_rejects_unordered_table() {
        let err = InferenceConfig::from_yaml(
            "mappings:\n  - { derived: \"7\", max_reference: 59 }\n  - { derived: \"6\", max_reference: 56 }\n",
        )
        .unwrap_err();
        assert!(matches!(err, CompatError::InvalidMapping(_)));
    }

    #[test]
    fn test_same_browser_pair_is_rejected() {
        let mut config = InferenceConfig::default();
        config.derived_browser = config.reference_browser.clone();
        assert!(matches!(config.validate(), Err(CompatError::Config(_))));
    }
}
