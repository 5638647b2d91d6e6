use std::sync::{Arc, OnceLock};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::collaborators::{Application, ApplicationRuntime};

type Continuation = Box<dyn FnOnce(&dyn Application) + Send + 'static>;

/// Owns the one-time start of the GUI runtime and queues work for when it is ready.
///
/// The first [`then_accept`](Self::then_accept) spawns a single worker task that
/// starts the runtime and then runs continuations in registration order,
/// including those registered after the runtime became ready. If the runtime
/// fails to start, queued and future continuations are dropped.
pub struct ApplicationStarter {
    runtime: Arc<dyn ApplicationRuntime>,
    handle: Handle,
    queue: OnceLock<mpsc::UnboundedSender<Continuation>>,
}

impl ApplicationStarter {
    pub fn new(runtime: Arc<dyn ApplicationRuntime>, handle: Handle) -> Self {
        Self {
            runtime,
            handle,
            queue: OnceLock::new(),
        }
    }

    /// Never blocks. `has_tray_icon` only matters on the first call.
    pub fn then_accept<F>(&self, has_tray_icon: bool, continuation: F)
    where
        F: FnOnce(&dyn Application) + Send + 'static,
    {
        let sender = self.queue.get_or_init(|| self.spawn_worker(has_tray_icon));
        if sender.send(Box::new(continuation)).is_err() {
            debug!("application is not available, dropping continuation");
        }
    }

    pub fn is_started(&self) -> bool {
        self.queue.get().is_some()
    }

    fn spawn_worker(&self, has_tray_icon: bool) -> mpsc::UnboundedSender<Continuation> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Continuation>();
        let runtime = Arc::clone(&self.runtime);
        self.handle.spawn(async move {
            debug!(has_tray_icon, "starting application runtime");
            let app = match runtime.start(has_tray_icon).await {
                Ok(app) => app,
                Err(err) => {
                    error!("application runtime failed to start: {err:#}");
                    return;
                }
            };
            info!("application ready");
            while let Some(continuation) = receiver.recv().await {
                continuation(app.as_ref());
            }
        });
        sender
    }
}
