//! Command-line interface for Lectern.
//!
//! - `lectern ingest`: upload the markdown content tree to the vector store
//! - `lectern serve`: run the search gateway
//! - `lectern search <query>`: run the gateway pipeline once and print JSON
//! - `lectern config ...`: inspect and edit the TOML configuration

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;

pub use app::LecternCli;
pub use cli::{CliArgs, Command};
pub use config::LecternConfig;
