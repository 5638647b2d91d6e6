use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::attributes::EntryKind;
use crate::fs::{DebrisFs, LocalFs};
use crate::report::{CleanupFailure, CleanupReport, EntryAction, EntryOutcome, Operation};

/// Removes leftovers of vaults that were not unmounted regularly.
///
/// Only the immediate children of the scanned directory are considered:
/// junction-like entries are removed unconditionally, empty directories and
/// dead links are removed, everything else stays. Errors never escape; they
/// end up in the returned [`CleanupReport`] and in a single warning per scan.
#[derive(Debug, Clone, Default)]
pub struct DebrisCleaner<F = LocalFs> {
    fs: F,
}

impl DebrisCleaner<LocalFs> {
    pub fn new() -> Self {
        Self { fs: LocalFs }
    }
}

impl<F: DebrisFs> DebrisCleaner<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    pub fn remove_debris(&self, dir: &Path) -> CleanupReport {
        debug!(path = %dir.display(), "performing cleanup of mount point dir");

        let entries = match self.fs.list(dir) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(path = %dir.display(), %error, "unable to perform cleanup of mount point dir");
                return CleanupReport::from_listing_error(dir, error);
            }
        };

        let mut report = CleanupReport::new(dir);
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(error) => {
                    report.failures.push(CleanupFailure::new(dir, Operation::ReadEntry, error));
                    continue;
                }
            };
            match self.clean_entry(&path) {
                Ok((kind, action)) => report.entries.push(EntryOutcome { path, kind, action }),
                Err(failure) => report.failures.push(failure),
            }
        }

        if report.has_failures() {
            warn!(
                path = %dir.display(),
                failures = report.failures.len(),
                "unable to perform cleanup of mount point dir: {}",
                report.failure_summary()
            );
        } else {
            debug!(
                path = %dir.display(),
                removed = report.removed_count(),
                "mount point dir cleanup finished"
            );
        }

        report
    }

    fn clean_entry(&self, path: &Path) -> Result<(EntryKind, EntryAction), CleanupFailure> {
        let attributes = self
            .fs
            .attributes(path)
            .map_err(|error| CleanupFailure::new(path, Operation::ReadAttributes, error))?;
        let kind = EntryKind::from(attributes);

        let action = match kind {
            EntryKind::JunctionDirectory => {
                self.fs
                    .remove_junction(path)
                    .map_err(|error| CleanupFailure::new(path, Operation::RemoveJunction, error))?;
                debug!(path = %path.display(), "removed junction from mount point dir");
                EntryAction::RemovedJunction
            }
            EntryKind::PlainDirectory => self.remove_empty_dir(path)?,
            EntryKind::Symlink => self.remove_dead_link(path)?,
            EntryKind::Other => {
                debug!(path = %path.display(), "found non-directory element in mount point dir");
                EntryAction::Ignored
            }
        };

        Ok((kind, action))
    }

    fn remove_empty_dir(&self, path: &Path) -> Result<EntryAction, CleanupFailure> {
        match self.fs.remove_dir(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed empty directory from mount point dir");
                Ok(EntryAction::RemovedEmptyDirectory)
            }
            Err(error) if error.kind() == io::ErrorKind::DirectoryNotEmpty => {
                info!(path = %path.display(), "found non-empty directory in mount point dir");
                Ok(EntryAction::RetainedNonEmptyDirectory)
            }
            Err(error) => Err(CleanupFailure::new(path, Operation::RemoveDirectory, error)),
        }
    }

    fn remove_dead_link(&self, path: &Path) -> Result<EntryAction, CleanupFailure> {
        match self.fs.target_exists(path) {
            Ok(true) => Ok(EntryAction::RetainedLiveLink),
            Ok(false) => {
                self.fs
                    .remove_link(path)
                    .map_err(|error| CleanupFailure::new(path, Operation::RemoveLink, error))?;
                debug!(path = %path.display(), "removed dead link from mount point dir");
                Ok(EntryAction::RemovedDeadLink)
            }
            Err(error) => {
                debug!(path = %path.display(), %error, "unable to resolve link target, leaving it");
                Ok(EntryAction::RetainedUnresolvedLink)
            }
        }
    }
}

/// Scans `dir` with the local filesystem.
pub fn remove_irregular_unmount_debris(dir: &Path) -> CleanupReport {
    DebrisCleaner::new().remove_debris(dir)
}
