//! Canonical ordering of support maps.
use serde_json::{Map, Value};

/// Return `support` with its browser keys in ascending order. Values are
/// untouched. The flag reports whether the order actually changed.
pub fn normalize(support: Map<String, Value>) -> (Map<String, Value>, bool) {
    let mut entries: Vec<(String, Value)> = support.into_iter().collect();
    let already_sorted = entries.windows(2).all(|pair| pair[0].0 <= pair[1].0);
    if !already_sorted {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
    }
    (entries.into_iter().collect(), !already_sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(map: &Map<String, Value>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_sorts_browser_keys() {
        let support = json!({
            "samsunginternet_android": { "version_added": "6.0" },
            "chrome": { "version_added": "56" },
            "firefox_android": { "version_added": false },
            "chrome_android": { "version_added": "56" }
        });
        let (sorted, reordered) = normalize(support.as_object().unwrap().clone());

        assert!(reordered);
        assert_eq!(
            keys(&sorted),
            vec!["chrome", "chrome_android", "firefox_android", "samsunginternet_android"]
        );
        assert_eq!(sorted["samsunginternet_android"], json!({ "version_added": "6.0" }));
    }

    #[test]
    fn test_sorted_input_is_reported_unchanged() {
        let support = json!({ "chrome": {}, "edge": {} });
        let (sorted, reordered) = normalize(support.as_object().unwrap().clone());
        assert!(!reordered);
        assert_eq!(keys(&sorted), vec!["chrome", "edge"]);
    }
}
