use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::attributes::EntryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadEntry,
    ReadAttributes,
    RemoveJunction,
    RemoveDirectory,
    RemoveLink,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::ReadEntry => "read entry in",
            Operation::ReadAttributes => "read attributes of",
            Operation::RemoveJunction => "remove junction",
            Operation::RemoveDirectory => "remove directory",
            Operation::RemoveLink => "remove link",
        };
        f.write_str(label)
    }
}

/// A filesystem error hit while processing one entry.
#[derive(Debug, Error)]
#[error("{operation} {}: {source}", .path.display())]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub operation: Operation,
    #[source]
    pub source: io::Error,
}

impl CleanupFailure {
    pub fn new(path: &Path, operation: Operation, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            operation,
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    RemovedJunction,
    RemovedEmptyDirectory,
    RemovedDeadLink,
    RetainedNonEmptyDirectory,
    RetainedLiveLink,
    /// The link target could not be checked, so the link stays.
    RetainedUnresolvedLink,
    Ignored,
}

impl EntryAction {
    pub fn is_removal(self) -> bool {
        matches!(
            self,
            EntryAction::RemovedJunction
                | EntryAction::RemovedEmptyDirectory
                | EntryAction::RemovedDeadLink
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub action: EntryAction,
}

/// Result of one scan of a mount point directory.
///
/// Entries and failures are kept in scan order. An entry appears in exactly one
/// of the two lists.
#[derive(Debug)]
pub struct CleanupReport {
    pub directory: PathBuf,
    pub entries: Vec<EntryOutcome>,
    pub failures: Vec<CleanupFailure>,
    pub listing_error: Option<io::Error>,
}

impl CleanupReport {
    pub(crate) fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            entries: Vec::new(),
            failures: Vec::new(),
            listing_error: None,
        }
    }

    pub(crate) fn from_listing_error(directory: &Path, error: io::Error) -> Self {
        Self {
            listing_error: Some(error),
            ..Self::new(directory)
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn listing_failed(&self) -> bool {
        self.listing_error.is_some()
    }

    pub fn removed(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries.iter().filter(|entry| entry.action.is_removal())
    }

    pub fn removed_count(&self) -> usize {
        self.removed().count()
    }

    pub fn retained(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries.iter().filter(|entry| !entry.action.is_removal())
    }

    /// Number of entries the scan looked at, failed or not.
    pub fn attempted(&self) -> usize {
        self.entries.len() + self.failures.len()
    }

    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = CleanupFailure::new(
            Path::new("/mnt/vault"),
            Operation::RemoveDirectory,
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(failure.to_string(), "remove directory /mnt/vault: denied");
    }

    #[test]
    fn test_counts() {
        let mut report = CleanupReport::new(Path::new("/mnt"));
        report.entries.push(EntryOutcome {
            path: PathBuf::from("/mnt/a"),
            kind: EntryKind::PlainDirectory,
            action: EntryAction::RemovedEmptyDirectory,
        });
        report.entries.push(EntryOutcome {
            path: PathBuf::from("/mnt/b"),
            kind: EntryKind::Symlink,
            action: EntryAction::RetainedLiveLink,
        });
        report.failures.push(CleanupFailure::new(
            Path::new("/mnt/c"),
            Operation::RemoveLink,
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        ));

        assert_eq!(report.removed_count(), 1);
        assert_eq!(report.retained().count(), 1);
        assert_eq!(report.attempted(), 3);
        assert!(report.has_failures());
        assert!(!report.listing_failed());
        assert_eq!(report.failure_summary(), "remove link /mnt/c: denied");
    }
}
