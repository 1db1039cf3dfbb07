mod file_config;

pub use file_config::FileConfig;

use crate::catalog_store::DEFAULT_READ_POOL_SIZE;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that take part in config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub catalog_db: Option<PathBuf>,
    pub read_pool_size: Option<usize>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_db: PathBuf,
    pub read_pool_size: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: CliConfig, file: Option<FileConfig>) -> Result<AppConfig> {
        let file = file.unwrap_or_default();

        let catalog_db = match file.catalog_db.map(PathBuf::from).or(cli.catalog_db) {
            Some(path) => path,
            None => bail!("No catalog database path given on the CLI or in the config file"),
        };

        let read_pool_size = file
            .read_pool_size
            .or(cli.read_pool_size)
            .unwrap_or(DEFAULT_READ_POOL_SIZE);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        Ok(AppConfig {
            catalog_db,
            read_pool_size,
        })
    }
}
