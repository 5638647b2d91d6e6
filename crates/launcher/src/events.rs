use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use crate::collaborators::LaunchEvents;
use crate::starter::ApplicationStarter;

/// External request reaching an already running instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchEvent {
    RevealApp,
    OpenFiles(Vec<PathBuf>),
}

#[derive(Debug, Clone)]
pub struct LaunchEventSender(mpsc::UnboundedSender<LaunchEvent>);

impl LaunchEventSender {
    /// Returns `false` once the handler is gone.
    pub fn send(&self, event: LaunchEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

/// Serves queued launch events for the rest of the process lifetime.
///
/// Events sent before [`LaunchEvents::start_handling`] are buffered and
/// processed in arrival order once handling starts.
pub struct LaunchEventHandler {
    starter: Arc<ApplicationStarter>,
    handle: Handle,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<LaunchEvent>>>,
}

impl LaunchEventHandler {
    pub fn new(starter: Arc<ApplicationStarter>, handle: Handle) -> (Self, LaunchEventSender) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handler = Self {
            starter,
            handle,
            receiver: Mutex::new(Some(receiver)),
        };
        (handler, LaunchEventSender(sender))
    }
}

impl LaunchEvents for LaunchEventHandler {
    fn start_handling(&self, has_tray_icon: bool) {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(mut receiver) = receiver else {
            debug!("launch events are already being handled");
            return;
        };

        let starter = Arc::clone(&self.starter);
        self.handle.spawn(async move {
            while let Some(event) = receiver.recv().await {
                dispatch(&starter, has_tray_icon, event);
            }
            debug!("launch event channel closed");
        });
    }
}

fn dispatch(starter: &ApplicationStarter, has_tray_icon: bool, event: LaunchEvent) {
    debug!(?event, "handling launch event");
    match event {
        LaunchEvent::RevealApp => starter.then_accept(has_tray_icon, |app| app.show_main_window()),
        LaunchEvent::OpenFiles(paths) => starter.then_accept(has_tray_icon, move |app| {
            for path in &paths {
                app.open_vault_file(path);
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{barrier, Recorder, RecordingRuntime};

    async fn drain(starter: &ApplicationStarter) {
        // let the handler task forward what it has received
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        barrier(starter).await;
    }

    #[tokio::test]
    async fn test_events_before_start_are_queued() {
        let recorder = Recorder::default();
        let runtime = Arc::new(RecordingRuntime::new(recorder.clone()));
        let starter = Arc::new(ApplicationStarter::new(runtime, Handle::current()));
        let (handler, sender) = LaunchEventHandler::new(Arc::clone(&starter), Handle::current());

        assert!(sender.send(LaunchEvent::OpenFiles(vec![
            PathBuf::from("/vaults/a/vault.cryptomator"),
            PathBuf::from("/vaults/b/vault.cryptomator"),
        ])));
        assert!(sender.send(LaunchEvent::RevealApp));

        handler.start_handling(true);
        drain(&starter).await;

        assert_eq!(
            recorder.calls(),
            vec![
                "runtime.start",
                "app.open:/vaults/a/vault.cryptomator",
                "app.open:/vaults/b/vault.cryptomator",
                "app.show_main_window",
            ]
        );
    }

    #[tokio::test]
    async fn test_start_handling_twice_is_a_no_op() {
        let recorder = Recorder::default();
        let runtime = Arc::new(RecordingRuntime::new(recorder.clone()));
        let starter = Arc::new(ApplicationStarter::new(runtime, Handle::current()));
        let (handler, sender) = LaunchEventHandler::new(Arc::clone(&starter), Handle::current());

        handler.start_handling(false);
        handler.start_handling(false);
        sender.send(LaunchEvent::RevealApp);
        drain(&starter).await;

        assert_eq!(recorder.count("app.show_main_window"), 1);
    }

    #[tokio::test]
    async fn test_send_fails_after_handler_dropped() {
        let recorder = Recorder::default();
        let runtime = Arc::new(RecordingRuntime::new(recorder));
        let starter = Arc::new(ApplicationStarter::new(runtime, Handle::current()));
        let (handler, sender) = LaunchEventHandler::new(starter, Handle::current());

        drop(handler);
        assert!(!sender.send(LaunchEvent::RevealApp));
    }
}
