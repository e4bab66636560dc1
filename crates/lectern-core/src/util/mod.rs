//! Utility modules for file discovery and reading.

pub mod files;
