//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use boost_db::Db;
use boost_engine::clock::SystemClock;
use boost_engine::metrics::RepositoryMetrics;
use boost_engine::service::BoostService;
use boost_engine::store::SqlBoostStore;

use crate::config::CliConfig;
use crate::output::Output;

/// Service wired to a store with live metrics and the wall clock.
pub type LiveService<'a> =
    BoostService<&'a SqlBoostStore, RepositoryMetrics<&'a SqlBoostStore, SystemClock>, SystemClock>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// `--db` override for `config.database`.
    db_override: Option<String>,
}

impl Context {
    /// Load context from config file.
    pub fn load(
        config_path: Option<&str>,
        db_override: Option<String>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        config
            .engine
            .validate()
            .context("Invalid [engine] configuration")?;

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            db_override,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
        let config_names = ["boost.toml", ".boost.toml", "boost.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config_path, config));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolved database file.
    pub fn database_path(&self) -> PathBuf {
        let path = self.db_override.as_deref().unwrap_or(&self.config.database);
        self.resolve_path(path)
    }

    /// Open the database and apply the schema.
    pub fn open_store(&self) -> Result<SqlBoostStore> {
        let path = self.database_path();
        let path_str = path.to_string_lossy();
        tracing::debug!(path = %path_str, "opening boost database");

        let db = Db::open(&path_str)
            .with_context(|| format!("Failed to open database: {}", path_str))?;
        let store = SqlBoostStore::new(db);
        store.migrate().context("Failed to apply schema")?;
        Ok(store)
    }

    /// Lifecycle service over `store`, priced with live metrics.
    pub fn service<'a>(&self, store: &'a SqlBoostStore) -> LiveService<'a> {
        let engine = self.config.engine.clone();
        let metrics = RepositoryMetrics::new(store, SystemClock, engine.activity_window_days);
        BoostService::new(store, metrics, SystemClock, engine)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
