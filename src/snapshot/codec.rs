//! Snapshot text encoding
//!
//! Documents are encoded as a single JSON object. Object keys are emitted in
//! sorted order, so the same document always produces the same text.

use serde_json::{Map, Value};

use crate::error::{BackupError, BackupResult};

use super::document::SnapshotDocument;

/// Current snapshot schema version
pub const SCHEMA_VERSION: u64 = 1;

/// Top-level key holding the schema version
pub const VERSION_KEY: &str = "schemaVersion";

/// Serializes and parses snapshot documents
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotCodec {
    pretty: bool,
}

impl SnapshotCodec {
    /// Create a codec producing compact output
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec producing indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Encode a document as text
    pub fn serialize(&self, document: &SnapshotDocument) -> BackupResult<String> {
        let mut root = Map::new();
        for (key, payload) in document.sections() {
            root.insert(key.clone(), payload.clone());
        }
        if let Some(version) = document.version() {
            root.insert(VERSION_KEY.to_string(), Value::from(version));
        }

        let root = Value::Object(root);
        let text = if self.pretty {
            serde_json::to_string_pretty(&root)
        } else {
            serde_json::to_string(&root)
        };

        text.map_err(|e| BackupError::Json(format!("Failed to serialize snapshot: {}", e)))
    }

    /// Decode text into a document
    ///
    /// Unknown top-level keys are kept. Missing sections are not an error.
    pub fn parse(&self, text: &str) -> BackupResult<SnapshotDocument> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| BackupError::MalformedSnapshot(e.to_string()))?;

        let mut root = match root {
            Value::Object(map) => map,
            other => {
                return Err(BackupError::MalformedSnapshot(format!(
                    "top level must be an object, found {}",
                    json_type_name(&other)
                )))
            }
        };

        let version = match root.remove(VERSION_KEY) {
            None => None,
            Some(value) => Some(value.as_u64().ok_or_else(|| {
                BackupError::MalformedSnapshot(format!(
                    "{} must be a non-negative integer, found {}",
                    VERSION_KEY, value
                ))
            })?),
        };

        let mut document = SnapshotDocument::new();
        document.set_version(version);
        for (key, payload) in root {
            document.insert(key, payload);
        }

        Ok(document)
    }
}

/// Name of a JSON value's type for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SectionName;
    use serde_json::json;

    fn sample_document() -> SnapshotDocument {
        let mut doc = SnapshotDocument::with_version(SCHEMA_VERSION);
        doc.insert_section(
            SectionName::Network,
            json!({"networkConfigurations": {"id-1": {"chainId": "0x539", "rpcUrl": "http://localhost:8545", "ticker": "ETH", "rpcPrefs": {}}}}),
        );
        doc.insert_section(SectionName::Preferences, json!({"theme": "dark", "useBlockie": true}));
        doc.insert("futureSection", json!([1, 2, 3]));
        doc
    }

    #[test]
    fn test_round_trip() {
        let codec = SnapshotCodec::new();
        let doc = sample_document();

        let text = codec.serialize(&doc).unwrap();
        assert_eq!(codec.parse(&text).unwrap(), doc);

        let pretty = SnapshotCodec::pretty().serialize(&doc).unwrap();
        assert_eq!(codec.parse(&pretty).unwrap(), doc);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let codec = SnapshotCodec::new();
        let text = codec.serialize(&sample_document()).unwrap();

        assert_eq!(text, codec.serialize(&sample_document()).unwrap());
        // keys come out sorted
        let network = text.find("\"network\"").unwrap();
        let preferences = text.find("\"preferences\"").unwrap();
        assert!(network < preferences);
        assert!(text.contains("\"schemaVersion\":1"));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = SnapshotCodec::new().parse("definitely not json").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = SnapshotCodec::new().parse("[1, 2]").unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let err = SnapshotCodec::new()
            .parse(r#"{"schemaVersion": "one"}"#)
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_tolerates_missing_sections_and_version() {
        let doc = SnapshotCodec::new().parse(r#"{"network": {}}"#).unwrap();
        assert_eq!(doc.version(), None);
        assert!(doc.has_section(SectionName::Network));
        assert!(!doc.has_section(SectionName::Preferences));
    }

    #[test]
    fn test_parse_keeps_unknown_keys() {
        let doc = SnapshotCodec::new()
            .parse(r#"{"swapsPreferences": {"slippage": 3}}"#)
            .unwrap();
        assert_eq!(doc.get("swapsPreferences"), Some(&json!({"slippage": 3})));
        assert_eq!(doc.unknown_keys(), vec!["swapsPreferences"]);
    }
}
