use std::path::PathBuf;

use crate::config::{Config, ConfigPaths};

pub const MOUNT_POINTS_DIR_VAR: &str = "VAULTKEEP_MOUNTPOINTS_DIR";

/// Source of the directory that holds per-vault mount points.
pub trait Environment: Send + Sync {
    fn mount_points_dir(&self) -> Option<PathBuf>;
}

/// Resolves the mount points directory from the process environment and the
/// settings file, in that order.
#[derive(Debug, Clone)]
pub struct SystemEnvironment {
    configured: Option<PathBuf>,
}

impl SystemEnvironment {
    pub fn new(config: &Config, paths: &ConfigPaths) -> Self {
        let configured = config
            .general
            .mount_points_dir
            .as_deref()
            .map(|template| expand_path_template(template, paths));
        Self { configured }
    }

    fn from_env_var() -> Option<PathBuf> {
        std::env::var_os(MOUNT_POINTS_DIR_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }
}

impl Environment for SystemEnvironment {
    fn mount_points_dir(&self) -> Option<PathBuf> {
        Self::from_env_var().or_else(|| self.configured.clone())
    }
}

pub fn expand_path_template(template: &str, paths: &ConfigPaths) -> PathBuf {
    let home_dir = std::env::var("HOME").unwrap_or_else(|_| "/".to_string());
    let replaced = template
        .replace("${HOME}", &home_dir)
        .replace("${DATA_DIR}", &paths.data_dir.to_string_lossy())
        .replace("${CONFIG_DIR}", &paths.config_dir().to_string_lossy());
    PathBuf::from(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_paths() -> ConfigPaths {
        ConfigPaths {
            config_path: PathBuf::from("/tmp/vaultkeep-config/config.toml"),
            data_dir: PathBuf::from("/tmp/vaultkeep-data"),
        }
    }

    #[test]
    fn test_expand_path_template() {
        let paths = test_paths();
        assert_eq!(
            expand_path_template("${DATA_DIR}/mnt", &paths),
            PathBuf::from("/tmp/vaultkeep-data/mnt")
        );
        assert_eq!(
            expand_path_template("${CONFIG_DIR}/mnt", &paths),
            PathBuf::from("/tmp/vaultkeep-config/mnt")
        );
        assert_eq!(expand_path_template("/srv/mnt", &paths), PathBuf::from("/srv/mnt"));
    }

    #[test]
    fn test_configured_dir_without_override() {
        let mut config = Config::default_config();
        let paths = test_paths();
        assert_eq!(SystemEnvironment::new(&config, &paths).configured, None);

        config.general.mount_points_dir = Some("${DATA_DIR}/mnt".to_string());
        let env = SystemEnvironment::new(&config, &paths);
        assert_eq!(env.configured, Some(PathBuf::from("/tmp/vaultkeep-data/mnt")));
    }
}
