use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use vaultkeep_core::LogLevel;

/// `RUST_LOG` wins over the configured level.
pub fn init(level: LogLevel) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn default_directives(level: LogLevel) -> String {
    let level = level.as_directive();
    format!("warn,vaultkeep_cli={level},vaultkeep_core={level},launcher={level},mount_cleaner={level}")
}
