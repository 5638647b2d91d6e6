//! Application launch sequencing: tray and window setup, mount point cleanup,
//! auto-unlock dispatch and launch event handling.

pub mod collaborators;
pub mod events;
pub mod orchestrator;
pub mod selector;
pub mod starter;

#[cfg(test)]
mod test_support;

pub use collaborators::{
    Application, ApplicationRuntime, LaunchEvents, ReopenEvents, ReopenHandler, ReopenSignal,
    TrayError, TrayIntegration,
};
pub use events::{LaunchEvent, LaunchEventHandler, LaunchEventSender};
pub use orchestrator::{
    Collaborators, LaunchPhase, LaunchSettings, LaunchState, StartupOrchestrator, WindowDecision,
};
pub use selector::{select_auto_unlock, should_attempt_auto_unlock};
pub use starter::ApplicationStarter;
