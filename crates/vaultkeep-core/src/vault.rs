use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{Config, VaultConfig};
use crate::ids::VaultId;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultSettings {
    pub unlock_after_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vault {
    pub id: VaultId,
    pub name: String,
    pub path: PathBuf,
    pub locked: bool,
    pub settings: VaultSettings,
}

impl Vault {
    /// Vaults loaded from settings are always locked until an unlock workflow succeeds.
    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            path: config.path.clone(),
            locked: true,
            settings: VaultSettings {
                unlock_after_startup: config.unlock_after_startup,
            },
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Read access to the known vaults, in registration order.
pub trait VaultRegistry: Send + Sync {
    fn vaults(&self) -> Vec<Vault>;
}

#[derive(Debug, Default)]
pub struct InMemoryVaultRegistry {
    vaults: Vec<Vault>,
}

impl InMemoryVaultRegistry {
    pub fn new(vaults: Vec<Vault>) -> Self {
        Self { vaults }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.vaults.iter().map(Vault::from_config).collect())
    }
}

impl VaultRegistry for InMemoryVaultRegistry {
    fn vaults(&self) -> Vec<Vault> {
        self.vaults.clone()
    }
}
