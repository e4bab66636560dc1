//! Frontmatter extraction and document metadata.
//!
//! Markdown pages may start with a `---`-delimited block of `key: value`
//! lines. [`parse_frontmatter`] pulls that block apart, and
//! [`DocumentMetadata`] combines it with file identity before upload.

pub mod frontmatter;
pub mod metadata;

pub use frontmatter::{parse_frontmatter, Frontmatter, ParsedDocument, CONTENT_LENGTH_KEY};
pub use metadata::{DocumentMetadata, MetadataValue};
