//! Note rewriting for the derived browser.
//!
//! Reference notes are copied only after every "Chrome NN" / "version NN"
//! phrase has been translated to a derived release and the remaining
//! reference-browser names have been replaced:
//! - `"Supported in Chrome 56 and later."` → `"Supported in Samsung Internet 6.0 and later."`
//! - notes naming a desktop platform are never copied

use crate::error::CompatError;
use crate::version::{VersionMapper, VersionToken};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

lazy_static! {
    /// Platform names that mark a note as specific to the reference browser
    static ref PLATFORM_NOTE: Regex = Regex::new(r"(?i)windows|linux|macos").unwrap();
}

/// True when a note mentions a desktop platform and must stay with the
/// reference browser.
pub fn is_platform_specific(note: &str) -> bool {
    PLATFORM_NOTE.is_match(note)
}

#[derive(Debug, Clone)]
pub struct NoteRewriter {
    mapper: VersionMapper,
    phrase: Regex,
    reference_name: String,
    derived_name: String,
}

impl NoteRewriter {
    pub fn new(
        mapper: VersionMapper,
        reference_name: impl Into<String>,
        derived_name: impl Into<String>,
    ) -> Result<Self, CompatError> {
        let reference_name = reference_name.into();
        let phrase = Regex::new(&format!(
            r"(?i)\b(?:{}|version)\s+(\d{{2,}})(?:\.\d+)*\b",
            regex::escape(&reference_name)
        ))?;

        Ok(Self {
            mapper,
            phrase,
            reference_name,
            derived_name: derived_name.into(),
        })
    }

    /// Rewrite one note. `None` means the note cannot be carried over: it is
    /// platform specific or names a version with no derived release.
    pub fn rewrite(&self, note: &str) -> Option<String> {
        if is_platform_specific(note) {
            return None;
        }

        let mut unmappable = false;
        let rewritten = self.phrase.replace_all(note, |caps: &Captures| {
            match self.mapper.map(&VersionToken::Release(caps[1].to_string())) {
                token if token.is_release() => format!("{} {}", self.derived_name, token),
                _ => {
                    unmappable = true;
                    caps[0].to_string()
                }
            }
        });
        if unmappable {
            return None;
        }

        if self.reference_name.is_empty() {
            return Some(rewritten.into_owned());
        }
        Some(rewritten.replace(&self.reference_name, &self.derived_name))
    }

    /// Rewrite a `notes` field value. Arrays are rewritten element-wise and
    /// lose the elements that cannot be carried over; `None` means nothing
    /// is left to copy. Non-text values are returned unchanged.
    pub fn rewrite_field(&self, notes: &Value) -> Option<Value> {
        match notes {
            Value::String(note) => self.rewrite(note).map(Value::String),
            Value::Array(items) => {
                let kept: Vec<Value> = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(note) => self.rewrite(note).map(Value::String),
                        other => Some(other.clone()),
                    })
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    Some(Value::Array(kept))
                }
            }
            other => Some(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::MappingEntry;
    use serde_json::json;

    fn rewriter() -> NoteRewriter {
        let mapper = VersionMapper::new(vec![
            MappingEntry::new("5.0", 51.0),
            MappingEntry::new("6.0", 56.0),
            MappingEntry::new("7.0", 59.0),
        ])
        .unwrap();
        NoteRewriter::new(mapper, "Chrome", "Samsung Internet").unwrap()
    }

    #[test]
    fn test_rewrites_chrome_version_phrase() {
        assert_eq!(
            rewriter().rewrite("Supported in Chrome 56 and later.").as_deref(),
            Some("Supported in Samsung Internet 6.0 and later.")
        );
    }

    #[test]
    fn test_rewrites_version_phrase_case_insensitively() {
        assert_eq!(
            rewriter().rewrite("Before VERSION 58, only prefixed.").as_deref(),
            Some("Before Samsung Internet 7.0, only prefixed.")
        );
        assert_eq!(
            rewriter().rewrite("From chrome 52.0.2743 onwards").as_deref(),
            Some("From Samsung Internet 6.0 onwards")
        );
    }

    #[test]
    fn test_replaces_remaining_browser_name() {
        assert_eq!(
            rewriter().rewrite("Chrome requires a user gesture.").as_deref(),
            Some("Samsung Internet requires a user gesture.")
        );
    }

    #[test]
    fn test_platform_notes_are_not_copied() {
        assert!(is_platform_specific("Only on Windows 10."));
        assert!(is_platform_specific("not supported on macOS"));
        assert!(rewriter().rewrite("Works on Linux only.").is_none());
    }

    #[test]
    fn test_unmappable_phrase_drops_note() {
        // 80 is newer than the table
        assert!(rewriter().rewrite("Unprefixed in Chrome 80.").is_none());
        // 30 predates the table, so there is no release to name
        assert!(rewriter().rewrite("Since Chrome 30.").is_none());
    }

    #[test]
    fn test_three_digit_versions_go_through_the_mapper() {
        assert!(rewriter().rewrite("Unprefixed in Chrome 100.").is_none());
        assert!(rewriter().rewrite("Changed in version 120.0.6099.").is_none());
    }

    #[test]
    fn test_array_field_drops_only_unusable_items() {
        let notes = json!(["Supported since Chrome 55.", "Windows only.", "Chrome quirk."]);
        assert_eq!(
            rewriter().rewrite_field(&notes),
            Some(json!(["Supported since Samsung Internet 6.0.", "Samsung Internet quirk."]))
        );
        assert_eq!(rewriter().rewrite_field(&json!(["On Windows."])), None);
    }

    #[test]
    fn test_non_text_values_pass_through() {
        assert_eq!(rewriter().rewrite_field(&json!(42)), Some(json!(42)));
    }
}
