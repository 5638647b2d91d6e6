use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use mount_cleaner::{CleanupReport, DebrisCleaner, DebrisFs, LocalFs};
use vaultkeep_core::{Config, Environment, Vault, VaultRegistry};

use crate::collaborators::{LaunchEvents, ReopenEvents, TrayIntegration};
use crate::selector::select_auto_unlock;
use crate::starter::ApplicationStarter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchSettings {
    pub start_hidden: bool,
}

impl LaunchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            start_hidden: config.general.start_hidden,
        }
    }
}

/// Everything the orchestrator talks to, wired by the caller.
pub struct Collaborators {
    pub environment: Arc<dyn Environment>,
    pub vaults: Arc<dyn VaultRegistry>,
    /// Absent on platforms without any tray integration.
    pub tray: Option<Arc<dyn TrayIntegration>>,
    pub starter: Arc<ApplicationStarter>,
    pub reopen: Arc<dyn ReopenEvents>,
    pub launch_events: Arc<dyn LaunchEvents>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    Init,
    TraySetup,
    WindowDecision,
    BackgroundCleanup,
    AutoUnlockDispatch,
    SteadyState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// Showing was scheduled on the application-ready future.
    Shown,
    HiddenInTray,
}

/// In-memory record of one process launch. Never persisted.
#[derive(Debug)]
pub struct LaunchState {
    pub has_tray_icon: bool,
    pub window: WindowDecision,
    pub phases: Vec<LaunchPhase>,
    pub cleanup: Option<CleanupReport>,
    pub auto_unlock_dispatched: usize,
}

impl LaunchState {
    fn new() -> Self {
        Self {
            has_tray_icon: false,
            window: WindowDecision::Shown,
            phases: vec![LaunchPhase::Init],
            cleanup: None,
            auto_unlock_dispatched: 0,
        }
    }

    fn enter(&mut self, phase: LaunchPhase) {
        debug!(?phase, "launch phase");
        self.phases.push(phase);
    }

    pub fn main_window_shown(&self) -> bool {
        self.window == WindowDecision::Shown
    }

    pub fn phase(&self) -> LaunchPhase {
        self.phases.last().copied().unwrap_or(LaunchPhase::Init)
    }
}

/// Sequences application startup: tray, main window, mount point cleanup,
/// auto-unlock and hand-over to the launch event handler.
///
/// `launch` consumes the orchestrator, so a process can only launch once.
pub struct StartupOrchestrator<F = LocalFs> {
    settings: LaunchSettings,
    collaborators: Collaborators,
    cleaner: DebrisCleaner<F>,
}

impl StartupOrchestrator<LocalFs> {
    pub fn new(settings: LaunchSettings, collaborators: Collaborators) -> Self {
        Self {
            settings,
            collaborators,
            cleaner: DebrisCleaner::new(),
        }
    }
}

impl<F: DebrisFs> StartupOrchestrator<F> {
    pub fn with_cleaner<G: DebrisFs>(self, cleaner: DebrisCleaner<G>) -> StartupOrchestrator<G> {
        StartupOrchestrator {
            settings: self.settings,
            collaborators: self.collaborators,
            cleaner,
        }
    }

    pub fn launch(self) -> LaunchState {
        let mut state = LaunchState::new();

        state.enter(LaunchPhase::TraySetup);
        state.has_tray_icon = self.install_tray_icon();
        let has_tray_icon = state.has_tray_icon;

        state.enter(LaunchPhase::WindowDecision);
        if has_tray_icon && self.settings.start_hidden {
            debug!("hiding application");
            if let Some(tray) = &self.collaborators.tray {
                tray.minimize_to_tray();
            }
            state.window = WindowDecision::HiddenInTray;
        } else {
            show_main_window_async(&self.collaborators.starter, has_tray_icon);
            state.window = WindowDecision::Shown;
        }

        let starter = Arc::clone(&self.collaborators.starter);
        self.collaborators
            .reopen
            .on_reopen(Box::new(move || show_main_window_async(&starter, has_tray_icon)));

        state.enter(LaunchPhase::BackgroundCleanup);
        state.cleanup = self.clean_mount_points();

        state.enter(LaunchPhase::AutoUnlockDispatch);
        state.auto_unlock_dispatched = self.dispatch_auto_unlock(has_tray_icon);

        state.enter(LaunchPhase::SteadyState);
        self.collaborators.launch_events.start_handling(has_tray_icon);

        info!(
            has_tray_icon,
            main_window_shown = state.main_window_shown(),
            auto_unlock = state.auto_unlock_dispatched,
            "application launched"
        );
        state
    }

    fn install_tray_icon(&self) -> bool {
        let Some(tray) = &self.collaborators.tray else {
            debug!("no tray integration available");
            return false;
        };
        if !tray.is_supported() {
            debug!("system tray not supported");
            return false;
        }
        match tray.install_icon() {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "unable to install tray icon, continuing without");
                false
            }
        }
    }

    /// Cleans leftovers of vaults that were not unmounted regularly.
    fn clean_mount_points(&self) -> Option<CleanupReport> {
        let dir = self.collaborators.environment.mount_points_dir()?;
        if !exists_no_follow(&dir) {
            return None;
        }
        Some(self.cleaner.remove_debris(&dir))
    }

    fn dispatch_auto_unlock(&self, has_tray_icon: bool) -> usize {
        let vaults = self.collaborators.vaults.vaults();
        let candidates: Vec<Vault> = select_auto_unlock(&vaults).into_iter().cloned().collect();
        if candidates.is_empty() {
            return 0;
        }

        let count = candidates.len();
        info!(count, "scheduling auto-unlock");
        self.collaborators.starter.then_accept(has_tray_icon, move |app| {
            for vault in &candidates {
                debug!(vault = %vault.name, id = %vault.id, "starting unlock workflow");
                app.start_unlock_workflow(vault);
            }
        });
        count
    }
}

fn show_main_window_async(starter: &ApplicationStarter, has_tray_icon: bool) {
    starter.then_accept(has_tray_icon, |app| app.show_main_window());
}

fn exists_no_follow(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}
