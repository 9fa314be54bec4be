//! Reading and writing compat documents in the corpus' canonical form:
//! two-space indentation, insertion-ordered keys, trailing newline.
use crate::error::CompatError;
use serde_json::Value;

pub fn parse_document(text: &str) -> Result<Value, CompatError> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| CompatError::MalformedDocument(e.to_string()))?;
    if !document.is_object() {
        return Err(CompatError::MalformedDocument(
            "top level is not an object".to_string(),
        ));
    }
    Ok(document)
}

pub fn to_canonical_string(document: &Value) -> String {
    let mut out = serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form_keeps_key_order() {
        let text = "{\n  \"z\": {\n    \"b\": 1,\n    \"a\": [\n      true\n    ]\n  },\n  \"a\": {}\n}\n";
        let document = parse_document(text).unwrap();
        assert_eq!(to_canonical_string(&document), text);
    }

    #[test]
    fn test_rejects_invalid_and_non_object_json() {
        assert!(matches!(parse_document("{ oops"), Err(CompatError::MalformedDocument(_))));
        assert!(matches!(parse_document("[]"), Err(CompatError::MalformedDocument(_))));
    }
}
