//! Shared errors and file utilities for Lectern.
//!
//! This crate provides the foundational types used across all Lectern crates.
//! It has no internal Lectern dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`util`]: File discovery and reading

pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
