pub mod attributes;
pub mod cleaner;
pub mod fs;
pub mod report;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use attributes::{EntryAttributes, EntryKind, ReparseTag};
pub use cleaner::{remove_irregular_unmount_debris, DebrisCleaner};
pub use fs::{DebrisFs, LocalFs};
pub use report::{CleanupFailure, CleanupReport, EntryAction, EntryOutcome, Operation};
