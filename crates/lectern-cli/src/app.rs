//! The `lectern` application.
//!
//! Loads configuration once, applies command-line overrides and dispatches
//! to ingestion, the search gateway, one-off search or config management.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use lectern_api::GatewayState;
use lectern_core::{Error, Result};
use lectern_ingest::{preflight, IngestOptions, IngestReport, Ingestor};
use lectern_vector::{MixedbreadStore, SearchConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::LecternConfig;
use crate::config_handlers;

/// CLI application state.
pub struct LecternCli {
    name: String,
    config: LecternConfig,
    version: String,
}

impl LecternCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = LecternConfig::load(args.config.as_deref())?
            .with_store_overrides(args.store.api_key.clone(), args.store.vector_store_id.clone());
        Ok(Self::new(config))
    }

    /// Create with an already-loaded configuration.
    pub fn new(config: LecternConfig) -> Self {
        Self {
            name: "lectern".to_string(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &LecternConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Ingest {
                content,
                manifest,
                force,
            }) => {
                let report = self.ingest(content, manifest, force).await?;
                println!(
                    "Upload complete: {}/{} files uploaded successfully ({:.1}%), {} skipped, {} failed",
                    report.uploaded,
                    report.discovered,
                    report.success_rate(),
                    report.skipped,
                    report.failed()
                );
                for failure in &report.failures {
                    eprintln!("failed: {}: {}", failure.path.display(), failure.error);
                }
                Ok(())
            }
            Some(Command::Serve { host, port }) => {
                let host = host.unwrap_or_else(|| self.config.server.host.clone());
                let port = port.unwrap_or(self.config.server.port);
                let addr = resolve_addr(&host, port).await?;
                let state = self.gateway_state(self.config.search.clone())?;
                lectern_api::serve(state, addr).await
            }
            Some(Command::Search {
                query,
                granularity,
                top_k,
            }) => {
                let mut search = self.config.search.clone();
                if let Some(granularity) = granularity {
                    search.granularity = granularity;
                }
                if let Some(top_k) = top_k {
                    search.top_k = top_k;
                }
                let items = self.gateway_state(search)?.search(Some(query.as_str())).await?;
                println!("{}", serde_json::to_string_pretty(&items)?);
                Ok(())
            }
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    /// Upload the content tree.
    ///
    /// Fails before any upload if credentials, the content directory or the
    /// manifest are unusable, and stops early if the manifest cannot be
    /// saved. Per-file failures are reported, not returned.
    async fn ingest(
        &self,
        content: Option<String>,
        manifest: Option<String>,
        force: bool,
    ) -> Result<IngestReport> {
        let content_root =
            PathBuf::from(content.unwrap_or_else(|| self.config.content.path.clone()));
        let vector_store_id = preflight(&self.config.mixedbread, &content_root)?;

        let mut options = IngestOptions::new(&content_root)
            .with_exclude_dirs(self.config.content.exclude.iter().cloned())
            .with_force(force);
        if let Some(path) = manifest.or_else(|| self.config.ingest.manifest_path.clone()) {
            options = options.with_manifest(path);
        }

        let store = MixedbreadStore::from_config(&self.config.mixedbread)?;
        tracing::info!(
            content = %content_root.display(),
            vector_store_id,
            "starting ingestion"
        );
        Ingestor::new(store, vector_store_id, options).run().await
    }

    /// Build gateway state; a missing credential leaves the store unset.
    fn gateway_state(&self, search: SearchConfig) -> Result<GatewayState> {
        let mut state = GatewayState::new(search);
        if self.config.mixedbread.api_key().is_ok() {
            let store = MixedbreadStore::from_config(&self.config.mixedbread)?;
            state = state.with_store(Arc::new(store));
        }
        if let Some(id) = &self.config.mixedbread.vector_store_id {
            state = state.with_vector_store_id(id.as_str());
        }
        Ok(state)
    }
}

async fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| Error::config(format!("could not resolve server address {host}:{port}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn configured(api_key: Option<&str>, id: Option<&str>) -> LecternConfig {
        LecternConfig::default()
            .with_store_overrides(api_key.map(String::from), id.map(String::from))
    }

    #[test]
    fn test_lectern_cli_new() {
        let cli = LecternCli::new(LecternConfig::default());
        assert_eq!(cli.name, "lectern");
        assert_eq!(cli.config().server.port, 3000);
    }

    #[test]
    fn test_from_args_applies_store_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[mixedbread]\nvector_store_id = \"vs_file\"\n").unwrap();

        let args = CliArgs::parse_from([
            "lectern",
            "--config",
            path.to_str().unwrap(),
            "--vector-store-id",
            "vs_flag",
            "version",
        ]);
        let cli = LecternCli::from_args(&args).unwrap();
        assert_eq!(cli.config().mixedbread.vector_store_id.as_deref(), Some("vs_flag"));
    }

    #[tokio::test]
    async fn test_run_version_command() {
        let cli = LecternCli::new(LecternConfig::default());
        let result = cli.run(CliArgs::parse_from(["lectern", "version"])).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_no_command() {
        let cli = LecternCli::new(LecternConfig::default());
        assert!(cli.run(CliArgs::parse_from(["lectern"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_ingest_without_credentials_fails() {
        let dir = TempDir::new().unwrap();
        let cli = LecternCli::new(configured(None, Some("vs")));

        let err = cli
            .ingest(Some(dir.path().display().to_string()), None, false)
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_ingest_missing_content_dir_fails() {
        let dir = TempDir::new().unwrap();
        let cli = LecternCli::new(configured(Some("key"), Some("vs")));

        let err = cli
            .ingest(Some(dir.path().join("nope").display().to_string()), None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("content directory not found"));
    }

    #[tokio::test]
    async fn test_search_unconfigured_fails() {
        let cli = LecternCli::new(LecternConfig::default());
        let err = cli
            .run(CliArgs::parse_from(["lectern", "search", "guide"]))
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_gateway_state_configuration() {
        let cli = LecternCli::new(configured(None, Some("vs")));
        assert!(!cli.gateway_state(SearchConfig::default()).unwrap().is_configured());

        let cli = LecternCli::new(configured(Some("key"), Some("vs")));
        assert!(cli.gateway_state(SearchConfig::default()).unwrap().is_configured());
    }

    #[tokio::test]
    async fn test_resolve_addr() {
        let addr = resolve_addr("127.0.0.1", 3000).await.unwrap();
        assert_eq!(addr.port(), 3000);
        assert!(addr.ip().is_loopback());
    }
}
