pub mod auto_unlock;
pub mod cleanup;
pub mod config;
pub mod launch;

use std::path::PathBuf;

use anyhow::Result;

use vaultkeep_core::{Config, ConfigPaths};

/// Resolved paths plus the config they point at.
pub struct Context {
    pub paths: ConfigPaths,
    pub config: Config,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut paths = ConfigPaths::resolve()?;
        if let Some(config_path) = config_path {
            paths.config_path = config_path;
        }
        let config = Config::load_or_default(&paths.config_path)?;
        Ok(Self { paths, config })
    }
}
