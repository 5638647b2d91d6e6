use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::{info, warn};

use launcher::{
    Application, ApplicationRuntime, ApplicationStarter, Collaborators, LaunchEvent,
    LaunchEventHandler, LaunchEventSender, LaunchSettings, LaunchState, ReopenSignal,
    StartupOrchestrator,
};
use vaultkeep_core::{Config, Environment, InMemoryVaultRegistry, SystemEnvironment, Vault};

use super::Context;

pub struct LaunchInputs {
    pub config_path: Option<PathBuf>,
    pub start_hidden: bool,
    pub files: Vec<PathBuf>,
}

pub fn execute(inputs: LaunchInputs) -> Result<()> {
    let ctx = Context::load(inputs.config_path)?;
    let environment = Arc::new(SystemEnvironment::new(&ctx.config, &ctx.paths));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    runtime.block_on(async move {
        let mut settings = LaunchSettings::from_config(&ctx.config);
        settings.start_hidden |= inputs.start_hidden;

        let session = HeadlessSession::launch(&ctx.config, settings, environment, Handle::current());
        if !inputs.files.is_empty() {
            session.events.send(LaunchEvent::OpenFiles(inputs.files));
        }
        if let Some(report) = &session.state.cleanup {
            info!(
                removed = report.removed_count(),
                failed = report.failures.len(),
                "mount points cleaned"
            );
        }

        forward_reopen_signal(Arc::clone(&session.reopen));
        println!("vaultkeep is running headless, press Ctrl-C to quit");
        tokio::signal::ctrl_c().await.context("wait for Ctrl-C")?;
        info!("shutting down");
        Ok::<(), anyhow::Error>(())
    })
}

/// Everything a running headless instance keeps alive.
struct HeadlessSession {
    state: LaunchState,
    events: LaunchEventSender,
    reopen: Arc<ReopenSignal>,
}

impl HeadlessSession {
    fn launch(
        config: &Config,
        settings: LaunchSettings,
        environment: Arc<dyn Environment>,
        handle: Handle,
    ) -> Self {
        let starter = Arc::new(ApplicationStarter::new(Arc::new(HeadlessRuntime), handle.clone()));
        let (handler, events) = LaunchEventHandler::new(Arc::clone(&starter), handle);
        let reopen = Arc::new(ReopenSignal::new());

        let collaborators = Collaborators {
            environment,
            vaults: Arc::new(InMemoryVaultRegistry::from_config(config)),
            tray: None,
            starter,
            reopen: reopen.clone(),
            launch_events: Arc::new(handler),
        };
        let state = StartupOrchestrator::new(settings, collaborators).launch();
        Self {
            state,
            events,
            reopen,
        }
    }
}

#[cfg(unix)]
fn forward_reopen_signal(reopen: Arc<ReopenSignal>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut stream = match signal(SignalKind::user_defined1()) {
        Ok(stream) => stream,
        Err(error) => {
            warn!(%error, "unable to listen for SIGUSR1, reopen disabled");
            return;
        }
    };
    tokio::spawn(async move {
        while stream.recv().await.is_some() {
            reopen.notify();
        }
    });
}

#[cfg(not(unix))]
fn forward_reopen_signal(_reopen: Arc<ReopenSignal>) {}

/// Runtime without a GUI: every application request is logged.
struct HeadlessRuntime;

#[async_trait]
impl ApplicationRuntime for HeadlessRuntime {
    async fn start(&self, has_tray_icon: bool) -> Result<Arc<dyn Application>> {
        info!(has_tray_icon, "starting headless application");
        Ok(Arc::new(HeadlessApp))
    }
}

struct HeadlessApp;

impl Application for HeadlessApp {
    fn show_main_window(&self) {
        info!("main window requested");
    }

    fn start_unlock_workflow(&self, vault: &Vault) {
        info!(
            vault = %vault.name,
            path = %vault.path.display(),
            "unlock requested, no interactive unlock available"
        );
    }

    fn open_vault_file(&self, path: &Path) {
        info!(path = %path.display(), "open vault file requested");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use launcher::{LaunchPhase, WindowDecision};
    use tempfile::TempDir;

    struct FixedEnvironment(PathBuf);

    impl Environment for FixedEnvironment {
        fn mount_points_dir(&self) -> Option<PathBuf> {
            Some(self.0.clone())
        }
    }

    fn config_with_vaults() -> Config {
        Config::from_toml_str(
            r#"
            [[vaults]]
            name = "work"
            path = "/vaults/work"
            unlock_after_startup = true

            [[vaults]]
            name = "archive"
            path = "/vaults/archive"
            "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_headless_launch_cleans_and_dispatches() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("stale")).unwrap();

        let session = HeadlessSession::launch(
            &config_with_vaults(),
            LaunchSettings { start_hidden: true },
            Arc::new(FixedEnvironment(dir.path().to_path_buf())),
            Handle::current(),
        );

        // no tray, so start_hidden cannot apply
        assert!(!session.state.has_tray_icon);
        assert_eq!(session.state.window, WindowDecision::Shown);
        assert_eq!(session.state.auto_unlock_dispatched, 1);
        assert_eq!(session.state.phase(), LaunchPhase::SteadyState);
        assert_eq!(session.state.cleanup.as_ref().unwrap().removed_count(), 1);
        assert!(!dir.path().join("stale").exists());
    }

    #[tokio::test]
    async fn test_headless_session_accepts_launch_events() {
        let dir = TempDir::new().unwrap();
        let session = HeadlessSession::launch(
            &Config::default_config(),
            LaunchSettings::default(),
            Arc::new(FixedEnvironment(dir.path().join("missing"))),
            Handle::current(),
        );

        assert!(session.state.cleanup.is_none());
        assert!(session
            .events
            .send(LaunchEvent::OpenFiles(vec![PathBuf::from("/vaults/work/vault.cryptomator")])));
        session.reopen.notify();
    }
}
