use vaultkeep_core::Vault;

pub fn should_attempt_auto_unlock(vault: &Vault) -> bool {
    vault.is_locked() && vault.settings.unlock_after_startup
}

/// Vaults to unlock right after startup, in input order.
pub fn select_auto_unlock<'a, I>(vaults: I) -> Vec<&'a Vault>
where
    I: IntoIterator<Item = &'a Vault>,
{
    vaults
        .into_iter()
        .filter(|vault| should_attempt_auto_unlock(vault))
        .collect()
}
