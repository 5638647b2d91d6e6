use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::attributes::EntryAttributes;

/// Filesystem operations the debris cleaner needs.
pub trait DebrisFs {
    /// Immediate children of `dir`. An entry that cannot be read fails on its
    /// own without ending the listing.
    fn list(&self, dir: &Path) -> io::Result<Vec<io::Result<PathBuf>>>;

    fn attributes(&self, path: &Path) -> io::Result<EntryAttributes>;

    /// Removes a junction-like entry without touching whatever it points to.
    fn remove_junction(&self, path: &Path) -> io::Result<()>;

    /// Non-recursive. Fails with `DirectoryNotEmpty` if `path` has children.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    fn remove_link(&self, path: &Path) -> io::Result<()>;

    /// Follows the link.
    fn target_exists(&self, link: &Path) -> io::Result<bool>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl DebrisFs for LocalFs {
    fn list(&self, dir: &Path) -> io::Result<Vec<io::Result<PathBuf>>> {
        let entries = fs::read_dir(dir)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect();
        Ok(entries)
    }

    fn attributes(&self, path: &Path) -> io::Result<EntryAttributes> {
        EntryAttributes::read(path)
    }

    fn remove_junction(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        #[cfg(windows)]
        {
            use std::os::windows::fs::FileTypeExt;
            if fs::symlink_metadata(path)?.file_type().is_symlink_dir() {
                return fs::remove_dir(path);
            }
        }
        fs::remove_file(path)
    }

    fn target_exists(&self, link: &Path) -> io::Result<bool> {
        link.try_exists()
    }
}
