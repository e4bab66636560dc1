//! Frontmatter extraction from markdown documents.
//!
//! The metadata block is the text between the first two `---` delimiters
//! of a document that starts with `---`. Each `key: value` line becomes a
//! field. Anything that does not fit this shape degrades to "no metadata"
//! rather than an error.

use std::collections::BTreeMap;

use crate::metadata::MetadataValue;

/// Block delimiter.
pub const DELIMITER: &str = "---";

/// Field coerced to a number when its value is numeric.
pub const CONTENT_LENGTH_KEY: &str = "content_length";

/// Parsed frontmatter fields.
pub type Frontmatter = BTreeMap<String, MetadataValue>;

/// Result of splitting a document into frontmatter and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Fields from the metadata block (empty when there is no block).
    pub frontmatter: Frontmatter,
    /// Text after the metadata block, trimmed; the full input when there
    /// is no block.
    pub body: String,
}

/// Split `text` into its frontmatter fields and body.
///
/// # Example
///
/// ```
/// use lectern_content::parse_frontmatter;
///
/// let doc = parse_frontmatter("---\ntitle: \"Guide\"\n---\nHello");
/// assert_eq!(doc.frontmatter["title"].as_str(), Some("Guide"));
/// assert_eq!(doc.body, "Hello");
/// ```
pub fn parse_frontmatter(text: &str) -> ParsedDocument {
    if !text.starts_with(DELIMITER) {
        return unstructured(text);
    }

    let parts: Vec<&str> = text.split(DELIMITER).collect();
    if parts.len() < 3 {
        return unstructured(text);
    }

    let block = parts[1].trim();
    let body = parts[2..].join(DELIMITER).trim().to_string();

    let mut frontmatter = Frontmatter::new();
    for line in block.lines() {
        if let Some((key, value)) = parse_line(line) {
            frontmatter.insert(key, value);
        }
    }

    log::trace!("parsed {} frontmatter fields", frontmatter.len());
    ParsedDocument { frontmatter, body }
}

fn unstructured(text: &str) -> ParsedDocument {
    ParsedDocument {
        frontmatter: Frontmatter::new(),
        body: text.to_string(),
    }
}

/// Parse one `key: value` line. The colon must not be the first character.
fn parse_line(line: &str) -> Option<(String, MetadataValue)> {
    let colon = line.find(':').filter(|&i| i > 0)?;
    let key = line[..colon].trim();
    if key.is_empty() {
        return None;
    }
    let value = strip_quotes(line[colon + 1..].trim());

    let value = if key == CONTENT_LENGTH_KEY {
        parse_number(value)
            .map(MetadataValue::Number)
            .unwrap_or_else(|| MetadataValue::Text(value.to_string()))
    } else {
        MetadataValue::Text(value.to_string())
    };

    Some((key.to_string(), value))
}

/// Remove exactly one layer of surrounding double quotes.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(if value == "\"" { "" } else { value })
}

/// An empty value counts as zero.
fn parse_number(value: &str) -> Option<serde_json::Number> {
    if value.is_empty() {
        return Some(0.into());
    }
    if let Ok(i) = value.parse::<i64>() {
        return Some(i.into());
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
}
