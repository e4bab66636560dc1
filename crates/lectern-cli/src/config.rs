//! Configuration for the `lectern` CLI.
//!
//! Provides [`LecternConfig`], loaded from TOML files, environment variables
//! and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `LECTERN_CONFIG` environment variable
//! 3. XDG default: `~/.config/lectern/config.toml`
//! 4. Built-in defaults
//!
//! `LECTERN_<SECTION>_<KEY>` variables are overlaid on top. Values arrive as
//! strings, so only string fields can be set this way.

use confyg::{env, Confygery};
use lectern_core::util::files::DEFAULT_EXCLUDED_DIRS;
use lectern_core::{Error, Result};
use lectern_vector::{SearchConfig, VectorStoreConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "LECTERN";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LecternConfig {
    /// Markdown content tree.
    pub content: ContentConfig,

    /// Hosted vector store.
    pub mixedbread: VectorStoreConfig,

    /// Search behaviour.
    pub search: SearchConfig,

    /// Ingestion settings.
    pub ingest: IngestConfig,

    /// Gateway server.
    pub server: ServerConfig,
}

/// Content tree configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Path to the content directory.
    pub path: String,

    /// Directory names skipped during discovery.
    pub exclude: Vec<String>,
}

/// Ingestion configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Upload manifest; unset means every run uploads everything.
    pub manifest_path: Option<String>,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,

    /// Host address to bind to.
    pub host: String,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: "content".to_string(),
            exclude: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl LecternConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        env_opts.add_section("content");
        env_opts.add_section("mixedbread");
        env_opts.add_section("search");
        env_opts.add_section("ingest");
        env_opts.add_section("server");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("LECTERN_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lectern").join("config.toml"))
    }

    /// Replace the store credentials with any given on the command line.
    pub fn with_store_overrides(
        mut self,
        api_key: Option<String>,
        vector_store_id: Option<String>,
    ) -> Self {
        if api_key.is_some() {
            self.mixedbread.api_key = api_key;
        }
        if vector_store_id.is_some() {
            self.mixedbread.vector_store_id = vector_store_id;
        }
        self
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `LECTERN_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }
}

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use lectern_vector::SearchGranularity;
    use std::collections::HashMap;

    /// RAII guard for env var manipulation in tests.
    pub(crate) struct EnvGuard {
        key: String,
        prev: Option<String>,
    }

    #[allow(unsafe_code)]
    impl EnvGuard {
        pub(crate) fn new(key: &str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: test-only; each guard touches a variable no other test reads.
            unsafe { std::env::set_var(key, value) };
            Self {
                key: key.to_string(),
                prev,
            }
        }

        pub(crate) fn remove(key: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: as above.
            unsafe { std::env::remove_var(key) };
            Self {
                key: key.to_string(),
                prev,
            }
        }
    }

    #[allow(unsafe_code)]
    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: restores the value captured in `new`/`remove`.
            unsafe {
                match &self.prev {
                    Some(val) => std::env::set_var(&self.key, val),
                    None => std::env::remove_var(&self.key),
                }
            }
        }
    }

    #[test]
    fn test_lectern_config_default() {
        let config = LecternConfig::default();
        assert_eq!(config.content.path, "content");
        assert_eq!(config.content.exclude, vec!["node_modules".to_string()]);
        assert!(config.mixedbread.api_key.is_none());
        assert_eq!(config.mixedbread.base_url, "https://api.mixedbread.com");
        assert_eq!(config.search.top_k, 10);
        assert_eq!(config.search.delay_ms, 200);
        assert!(config.ingest.manifest_path.is_none());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_lectern_config_from_toml() {
        let toml_str = r#"
            [content]
            path = "docs/content"

            [mixedbread]
            api_key = "mxb_test"
            vector_store_id = "vs_docs"

            [search]
            granularity = "file"
            chunks_per_file = 2

            [ingest]
            manifest_path = ".lectern/manifest.json"

            [server]
            port = 8080
        "#;

        let config: LecternConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.content.path, "docs/content");
        assert_eq!(config.content.exclude, vec!["node_modules".to_string()]);
        assert_eq!(config.mixedbread.api_key.as_deref(), Some("mxb_test"));
        assert_eq!(config.mixedbread.base_url, "https://api.mixedbread.com");
        assert_eq!(config.search.granularity, SearchGranularity::File);
        assert_eq!(config.search.chunks_per_file, 2);
        assert_eq!(config.search.top_k, 10);
        assert_eq!(
            config.ingest.manifest_path.as_deref(),
            Some(".lectern/manifest.json")
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_lectern_config_to_toml() {
        let config = LecternConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("port = 3000"));
        assert!(toml_str.contains("granularity = \"chunk\""));
        assert!(!toml_str.contains("api_key"));

        let parsed: LecternConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.content.path, config.content.path);
    }

    #[test]
    fn test_lectern_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [server]
                port = 9090
                [search]
                top_k = 4
            "#,
        )
        .unwrap();

        let config = LecternConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.search.top_k, 4);
    }

    #[test]
    fn test_lectern_config_load_missing_file_uses_defaults() {
        let config = LecternConfig::load(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.search.delay_ms, 200);
        assert_eq!(config.mixedbread.base_url, "https://api.mixedbread.com");
    }

    #[test]
    fn test_lectern_config_load_env_overlay() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [server]
                host = "127.0.0.1"
            "#,
        )
        .unwrap();

        let _guard = EnvGuard::new("LECTERN_SERVER_HOST", "0.0.0.0");
        let config = LecternConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_lectern_config_resolve_config_path() {
        let explicit = LecternConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(explicit, Some(PathBuf::from("/explicit/config.toml")));

        {
            let _guard = EnvGuard::new("LECTERN_CONFIG", "/env/config.toml");
            let from_env = LecternConfig::resolve_config_path(None);
            assert_eq!(from_env, Some(PathBuf::from("/env/config.toml")));
        }

        let _guard = EnvGuard::remove("LECTERN_CONFIG");
        let p = LecternConfig::resolve_config_path(None).unwrap();
        assert!(p.to_str().unwrap().contains("lectern"));
        assert!(p.to_str().unwrap().ends_with("config.toml"));
    }

    #[test]
    fn test_with_store_overrides() {
        let base = LecternConfig::default().with_store_overrides(Some("key".into()), None);
        assert_eq!(base.mixedbread.api_key.as_deref(), Some("key"));
        assert!(base.mixedbread.vector_store_id.is_none());

        let kept = base.with_store_overrides(None, Some("vs".into()));
        assert_eq!(kept.mixedbread.api_key.as_deref(), Some("key"));
        assert_eq!(kept.mixedbread.vector_store_id.as_deref(), Some("vs"));
    }

    #[test]
    fn test_lectern_config_to_env_vars() {
        let config = LecternConfig::default().with_store_overrides(None, Some("vs_docs".into()));
        let vars = config.to_env_vars().unwrap();
        let map: HashMap<_, _> = vars.into_iter().collect();
        assert_eq!(map.get("LECTERN_SERVER_PORT").unwrap(), "3000");
        assert_eq!(map.get("LECTERN_CONTENT_PATH").unwrap(), "content");
        assert_eq!(map.get("LECTERN_CONTENT_EXCLUDE").unwrap(), "[\"node_modules\"]");
        assert_eq!(map.get("LECTERN_MIXEDBREAD_VECTOR_STORE_ID").unwrap(), "vs_docs");
        assert_eq!(map.get("LECTERN_SEARCH_GRANULARITY").unwrap(), "chunk");
    }
}
