//! Narrow interfaces to the parts of the application that live outside the
//! launch core: tray, GUI runtime and OS launch signals.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use vaultkeep_core::Vault;

#[derive(Debug, Error)]
pub enum TrayError {
    #[error("system tray is not supported on this platform")]
    Unsupported,
    #[error("failed to install tray icon: {0}")]
    Install(String),
}

pub trait TrayIntegration: Send + Sync {
    fn is_supported(&self) -> bool;

    fn install_icon(&self) -> Result<(), TrayError>;

    /// Tells the platform the app starts minimized into the tray.
    fn minimize_to_tray(&self);
}

/// Handle to the running GUI application.
pub trait Application: Send + Sync {
    fn show_main_window(&self);

    /// Starts the interactive unlock flow. The workflow decides itself whether
    /// to prompt or use a stored secret.
    fn start_unlock_workflow(&self, vault: &Vault);

    fn open_vault_file(&self, path: &Path);
}

/// Starts the GUI runtime. Expensive; called at most once per process.
#[async_trait]
pub trait ApplicationRuntime: Send + Sync {
    async fn start(&self, has_tray_icon: bool) -> anyhow::Result<Arc<dyn Application>>;
}

pub type ReopenHandler = Box<dyn Fn() + Send + Sync>;

/// OS-level "re-open application" signal, e.g. a dock icon click.
pub trait ReopenEvents: Send + Sync {
    fn on_reopen(&self, handler: ReopenHandler);
}

/// Takes over external "open/activate" events once startup is done.
pub trait LaunchEvents: Send + Sync {
    fn start_handling(&self, has_tray_icon: bool);
}

/// In-process [`ReopenEvents`] source, fired by whatever integration observes
/// the OS signal.
#[derive(Default)]
pub struct ReopenSignal {
    handlers: Mutex<Vec<ReopenHandler>>,
}

impl ReopenSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every registered handler in registration order.
    pub fn notify(&self) {
        let handlers = self.handlers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::debug!(handlers = handlers.len(), "application reopened");
        for handler in handlers.iter() {
            handler();
        }
    }
}

impl ReopenEvents for ReopenSignal {
    fn on_reopen(&self, handler: ReopenHandler) {
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(handler);
    }
}
