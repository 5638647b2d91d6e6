use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use vaultkeep_core::{Environment, Vault, VaultId, VaultRegistry, VaultSettings};

use crate::collaborators::{
    Application, ApplicationRuntime, LaunchEvents, TrayError, TrayIntegration,
};
use crate::starter::ApplicationStarter;

/// Shared, ordered log of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|recorded| recorded == call)
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|recorded| *recorded == call).count()
    }
}

pub struct RecordingApp {
    recorder: Recorder,
}

impl Application for RecordingApp {
    fn show_main_window(&self) {
        self.recorder.push("app.show_main_window");
    }

    fn start_unlock_workflow(&self, vault: &Vault) {
        self.recorder.push(format!("app.unlock:{}", vault.name));
    }

    fn open_vault_file(&self, path: &Path) {
        self.recorder.push(format!("app.open:{}", path.display()));
    }
}

pub struct RecordingRuntime {
    recorder: Recorder,
    fail: bool,
    pub starts: AtomicUsize,
    pub tray_flags: Mutex<Vec<bool>>,
}

impl RecordingRuntime {
    pub fn new(recorder: Recorder) -> Self {
        Self {
            recorder,
            fail: false,
            starts: AtomicUsize::new(0),
            tray_flags: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(recorder: Recorder) -> Self {
        Self {
            fail: true,
            ..Self::new(recorder)
        }
    }
}

#[async_trait]
impl ApplicationRuntime for RecordingRuntime {
    async fn start(&self, has_tray_icon: bool) -> anyhow::Result<Arc<dyn Application>> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.tray_flags.lock().unwrap().push(has_tray_icon);
        self.recorder.push("runtime.start");
        if self.fail {
            anyhow::bail!("display server unavailable");
        }
        Ok(Arc::new(RecordingApp {
            recorder: self.recorder.clone(),
        }))
    }
}

pub struct RecordingTray {
    pub recorder: Recorder,
    pub supported: bool,
    pub install_fails: bool,
}

impl TrayIntegration for RecordingTray {
    fn is_supported(&self) -> bool {
        self.recorder.push("tray.is_supported");
        self.supported
    }

    fn install_icon(&self) -> Result<(), TrayError> {
        self.recorder.push("tray.install_icon");
        if self.install_fails {
            return Err(TrayError::Install("no status notifier host".to_string()));
        }
        Ok(())
    }

    fn minimize_to_tray(&self) {
        self.recorder.push("tray.minimize_to_tray");
    }
}

pub struct RecordingLaunchEvents {
    pub recorder: Recorder,
}

impl LaunchEvents for RecordingLaunchEvents {
    fn start_handling(&self, has_tray_icon: bool) {
        self.recorder
            .push(format!("launch_events.start_handling:{has_tray_icon}"));
    }
}

pub struct StaticEnvironment(pub Option<PathBuf>);

impl Environment for StaticEnvironment {
    fn mount_points_dir(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

pub struct StaticRegistry(pub Vec<Vault>);

impl VaultRegistry for StaticRegistry {
    fn vaults(&self) -> Vec<Vault> {
        self.0.clone()
    }
}

pub fn vault(name: &str, locked: bool, unlock_after_startup: bool) -> Vault {
    Vault {
        id: VaultId::new(),
        name: name.to_string(),
        path: PathBuf::from("/vaults").join(name),
        locked,
        settings: VaultSettings {
            unlock_after_startup,
        },
    }
}

/// Resolves once every continuation registered before it has run.
pub async fn barrier(starter: &ApplicationStarter) {
    let (tx, rx) = oneshot::channel();
    starter.then_accept(false, move |_| {
        let _ = tx.send(());
    });
    rx.await.expect("application runtime did not start");
}
