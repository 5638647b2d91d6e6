use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use vaultkeep_core::{Config, ConfigPaths, LogLevel};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "vaultkeep",
    version,
    about = "Start-up and housekeeping for encrypted vaults"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    Config {
        #[arg(long)]
        print: bool,
    },
    /// Remove mount points left behind by vaults that were not unmounted cleanly
    Cleanup {
        #[arg(long)]
        json: bool,
        /// Directory to clean instead of the configured mount points directory
        dir: Option<PathBuf>,
    },
    /// List the vaults that are unlocked right after startup
    AutoUnlock {
        #[arg(long)]
        json: bool,
    },
    /// Run the startup sequence without a GUI and wait for Ctrl-C
    Launch {
        #[arg(long)]
        start_hidden: bool,
        /// Vault files to open once the application is ready
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(configured_log_level(cli.config.clone()));

    match cli.command {
        Commands::Init { path, force } => {
            let config_path = match path.or(cli.config) {
                Some(path) => path,
                None => ConfigPaths::resolve()?.config_path,
            };
            commands::config::init(config_path, force)
        }
        Commands::Config { print } => {
            if print {
                commands::config::print_effective(cli.config)
            } else {
                Ok(())
            }
        }
        Commands::Cleanup { json, dir } => commands::cleanup::execute(cli.config, dir, json),
        Commands::AutoUnlock { json } => commands::auto_unlock::execute(cli.config, json),
        Commands::Launch {
            start_hidden,
            files,
        } => commands::launch::execute(commands::launch::LaunchInputs {
            config_path: cli.config,
            start_hidden,
            files,
        }),
    }
}

/// Logging comes up before any command runs, so config errors fall back to the default level.
fn configured_log_level(config_path: Option<PathBuf>) -> LogLevel {
    let config_path = match config_path {
        Some(path) => path,
        None => match ConfigPaths::resolve() {
            Ok(paths) => paths.config_path,
            Err(_) => return LogLevel::default(),
        },
    };
    Config::load_or_default(&config_path)
        .map(|config| config.logging.level)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_launch_with_files() {
        let cli = Cli::try_parse_from([
            "vaultkeep",
            "--config",
            "/tmp/vaultkeep.toml",
            "launch",
            "--start-hidden",
            "/vaults/a/vault.cryptomator",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/vaultkeep.toml")));
        match cli.command {
            Commands::Launch {
                start_hidden,
                files,
            } => {
                assert!(start_hidden);
                assert_eq!(files, vec![PathBuf::from("/vaults/a/vault.cryptomator")]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_cleanup_without_dir() {
        let cli = Cli::try_parse_from(["vaultkeep", "cleanup"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cleanup {
                json: false,
                dir: None
            }
        ));
    }

    #[test]
    fn test_log_level_from_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(configured_log_level(Some(path)), LogLevel::Debug);

        std::fs::write(dir.path().join("broken.toml"), "logging = 3").unwrap();
        assert_eq!(
            configured_log_level(Some(dir.path().join("broken.toml"))),
            LogLevel::Info
        );
    }
}
