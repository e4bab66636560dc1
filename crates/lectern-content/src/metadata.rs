//! Document metadata attached to uploaded files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key holding the project-relative path of the source file.
pub const FILE_PATH_KEY: &str = "file_path";

/// Key holding the source file's base name.
pub const FILE_NAME_KEY: &str = "file_name";

/// Key holding the full raw document text.
pub const TEXT_KEY: &str = "text";

/// A single metadata value: frontmatter values are strings, except for
/// numeric fields that were coerced at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Numeric value.
    Number(serde_json::Number),
    /// String value.
    Text(String),
}

impl MetadataValue {
    /// The string content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// The numeric content, if this is a number.
    pub fn as_number(&self) -> Option<&serde_json::Number> {
        match self {
            Self::Number(n) => Some(n),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// Metadata record sent alongside a file upload.
///
/// Frontmatter fields merged with the derived `file_path`, `file_name` and
/// `text` fields. Serializes as a flat JSON object in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentMetadata(BTreeMap<String, MetadataValue>);

impl DocumentMetadata {
    /// Create an empty metadata record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the upload record for one file.
    ///
    /// Derived fields overwrite frontmatter keys of the same name.
    pub fn for_file(
        frontmatter: BTreeMap<String, MetadataValue>,
        file_path: impl Into<String>,
        file_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let mut fields = frontmatter;
        fields.insert(FILE_PATH_KEY.to_string(), MetadataValue::Text(file_path.into()));
        fields.insert(FILE_NAME_KEY.to_string(), MetadataValue::Text(file_name.into()));
        fields.insert(TEXT_KEY.to_string(), MetadataValue::Text(text.into()));
        Self(fields)
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    /// Look up a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(MetadataValue::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.0.iter()
    }

    /// Convert into a JSON object.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.0
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    MetadataValue::Number(n) => serde_json::Value::Number(n.clone()),
                    MetadataValue::Text(s) => serde_json::Value::String(s.clone()),
                };
                (k.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn frontmatter() -> BTreeMap<String, MetadataValue> {
        let mut fm = BTreeMap::new();
        fm.insert("title".to_string(), MetadataValue::from("Guide"));
        fm.insert("content_length".to_string(), MetadataValue::from(1200));
        fm
    }

    #[test]
    fn test_for_file_merges_derived_fields() {
        let meta = DocumentMetadata::for_file(
            frontmatter(),
            "content/guide.md",
            "guide.md",
            "---\ntitle: Guide\n---\nbody",
        );

        assert_eq!(meta.get_str("title"), Some("Guide"));
        assert_eq!(meta.get_str(FILE_PATH_KEY), Some("content/guide.md"));
        assert_eq!(meta.get_str(FILE_NAME_KEY), Some("guide.md"));
        assert_eq!(meta.get_str(TEXT_KEY), Some("---\ntitle: Guide\n---\nbody"));
        assert_eq!(meta.len(), 5);
    }

    #[test]
    fn test_for_file_derived_fields_win() {
        let mut fm = BTreeMap::new();
        fm.insert("file_name".to_string(), MetadataValue::from("spoofed.md"));

        let meta = DocumentMetadata::for_file(fm, "content/a.md", "a.md", "");
        assert_eq!(meta.get_str(FILE_NAME_KEY), Some("a.md"));
    }

    #[test]
    fn test_serializes_flat_object_with_numbers() {
        let meta = DocumentMetadata::for_file(frontmatter(), "p", "n", "t");
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["title"], "Guide");
        assert_eq!(json["content_length"], 1200);
        assert!(json["content_length"].is_number());
        assert_eq!(json["file_path"], "p");
    }

    #[test]
    fn test_to_json_matches_serialization() {
        let meta = DocumentMetadata::for_file(frontmatter(), "p", "n", "t");
        let map = meta.to_json();
        assert_eq!(
            serde_json::Value::Object(map),
            serde_json::to_value(&meta).unwrap()
        );
    }

    #[test]
    fn test_metadata_value_accessors() {
        let text = MetadataValue::from("x");
        let num = MetadataValue::from(3);
        assert_eq!(text.as_str(), Some("x"));
        assert!(text.as_number().is_none());
        assert_eq!(num.as_number().and_then(|n| n.as_i64()), Some(3));
        assert!(num.as_str().is_none());
    }
}
