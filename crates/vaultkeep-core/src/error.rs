use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultkeepError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
