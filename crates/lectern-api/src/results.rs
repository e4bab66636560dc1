//! Reshaping store hits into search-dialog result items.

use std::collections::HashSet;

use lectern_vector::SearchHit;
use serde::{Deserialize, Serialize};

/// Title used when a hit has none.
pub const UNTITLED: &str = "Untitled";

/// Link used when a hit has no `source_url`.
pub const NO_URL: &str = "#";

/// Kind of a result item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Heading entry carrying the page title.
    Page,
    /// Detail entry carrying a snippet.
    Text,
}

/// One entry of the search dialog's result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiResultItem {
    /// `result-{i}-page` or `result-{i}-text`, where `i` is the post-dedup
    /// position of the hit.
    pub id: String,

    /// Link target; `#` when the document has no `source_url`.
    pub url: String,

    /// Whether this is the page title or the text snippet.
    #[serde(rename = "type")]
    pub kind: ResultType,

    /// Title for page items, snippet for text items.
    pub content: String,
}

/// Keep the first hit for each `file_id`, preserving rank order.
pub fn dedup_by_file(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.file_id.clone()))
        .collect()
}

/// Emit a page item and a text item per hit.
///
/// Item ids use the hit's position, so callers dedup first.
pub fn to_ui_items(hits: &[SearchHit]) -> Vec<UiResultItem> {
    hits.iter()
        .enumerate()
        .flat_map(|(i, hit)| {
            let url = hit.metadata_str("source_url").unwrap_or(NO_URL).to_string();
            let title = hit.metadata_str("title").unwrap_or(UNTITLED).to_string();
            [
                UiResultItem {
                    id: format!("result-{i}-page"),
                    url: url.clone(),
                    kind: ResultType::Page,
                    content: title,
                },
                UiResultItem {
                    id: format!("result-{i}-text"),
                    url,
                    kind: ResultType::Text,
                    content: snippet(hit),
                },
            ]
        })
        .collect()
}

// `path` metadata first, then the first non-empty chunk.
fn snippet(hit: &SearchHit) -> String {
    hit.metadata_str("path")
        .or_else(|| hit.chunks.iter().map(String::as_str).find(|c| !c.is_empty()))
        .unwrap_or_default()
        .to_string()
}
