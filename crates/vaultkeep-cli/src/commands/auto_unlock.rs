use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use launcher::select_auto_unlock;
use vaultkeep_core::{InMemoryVaultRegistry, Vault, VaultRegistry};

use super::Context;

pub fn execute(config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let vaults = InMemoryVaultRegistry::from_config(&ctx.config).vaults();
    let selected = select_auto_unlock(&vaults);

    if json {
        let value: Vec<_> = selected
            .iter()
            .map(|vault| json!({ "id": vault.id, "name": vault.name, "path": vault.path }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", render(&vaults, &selected));
    }
    Ok(())
}

fn render(vaults: &[Vault], selected: &[&Vault]) -> String {
    if selected.is_empty() {
        return format!("No vaults to unlock at startup ({} configured)", vaults.len());
    }
    let mut lines = vec![format!(
        "Vaults unlocked at startup: {} of {}",
        selected.len(),
        vaults.len()
    )];
    for vault in selected {
        lines.push(format!("  {} ({})", vault.name, vault.path.display()));
    }
    lines.join("\n")
}
