//! Hosted vector-store access for Lectern.
//!
//! Embedding, indexing and ranking are delegated to an external service;
//! this crate only describes what is sent and what comes back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     lectern-vector                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  VectorStore trait (search + upload)                        │
//! │  ├── MixedbreadStore (HTTP, reqwest)                        │
//! │  └── MockVectorStore (in-memory, for tests)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchRequest / SearchHit / UploadRequest / UploadedFile   │
//! │  VectorStoreConfig / SearchConfig / SearchGranularity       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lectern_vector::{MixedbreadStore, SearchRequest, VectorStore};
//!
//! let store = MixedbreadStore::new(api_key, lectern_vector::DEFAULT_BASE_URL);
//! let hits = store.search(&SearchRequest::new("routing", "vs_123")).await?;
//! for hit in hits {
//!     println!("{}: {:.3}", hit.file_id, hit.score);
//! }
//! ```

pub mod mixedbread;
pub mod mock;
pub mod store;
pub mod types;

pub use mixedbread::MixedbreadStore;
pub use mock::{MockVectorStore, RecordedUpload};
pub use store::VectorStore;
pub use types::{
    SearchConfig, SearchGranularity, SearchHit, SearchRequest, UploadRequest, UploadedFile,
    VectorStoreConfig, DEFAULT_BASE_URL,
};
