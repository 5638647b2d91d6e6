pub mod config;
pub mod error;
pub mod ids;
pub mod paths;
pub mod vault;

pub use config::{Config, ConfigPaths, LogLevel, VaultConfig};
pub use error::VaultkeepError;
pub use ids::VaultId;
pub use paths::{Environment, SystemEnvironment};
pub use vault::{InMemoryVaultRegistry, Vault, VaultRegistry, VaultSettings};
