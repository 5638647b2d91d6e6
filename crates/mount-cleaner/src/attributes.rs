use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x10;
const FILE_ATTRIBUTE_DEVICE: u32 = 0x40;
const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x400;

/// Basic attributes of a mount point directory entry, read without following links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryAttributes {
    pub is_directory: bool,
    pub is_symlink: bool,
    /// Neither a regular file, a directory nor a symlink.
    pub is_other: bool,
}

/// Reparse tag of a Windows reparse point, reduced to what classification needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparseTag {
    /// `IO_REPARSE_TAG_SYMLINK`
    Symlink,
    /// `IO_REPARSE_TAG_MOUNT_POINT`, i.e. a junction or volume mount point.
    MountPoint,
    Other,
}

impl EntryAttributes {
    /// Reads the attributes of `path` itself.
    pub fn read(path: &Path) -> io::Result<Self> {
        let metadata = fs::symlink_metadata(path)?;

        #[cfg(windows)]
        {
            use std::os::windows::fs::MetadataExt;

            let file_attributes = metadata.file_attributes();
            let tag = if file_attributes & FILE_ATTRIBUTE_REPARSE_POINT == 0 {
                None
            } else if !metadata.file_type().is_symlink() {
                // not a name surrogate
                Some(ReparseTag::Other)
            } else if junction::exists(path)? {
                Some(ReparseTag::MountPoint)
            } else {
                Some(ReparseTag::Symlink)
            };
            return Ok(Self::from_windows_attributes(file_attributes, tag));
        }

        #[cfg(not(windows))]
        return Ok(Self::from_metadata(&metadata));
    }

    pub fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        let is_symlink = file_type.is_symlink();
        let is_directory = file_type.is_dir();
        Self {
            is_directory,
            is_symlink,
            is_other: !is_symlink && !is_directory && !file_type.is_file(),
        }
    }

    /// Maps Windows file attributes plus the reparse tag, if any.
    ///
    /// Only symlink reparse points count as links; they are neither
    /// directories nor "other". Every other reparse point or device is
    /// "other", keeping its directory bit, so junctions end up as
    /// other + directory.
    pub fn from_windows_attributes(file_attributes: u32, tag: Option<ReparseTag>) -> Self {
        let is_reparse_point = file_attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0;
        let is_symlink = is_reparse_point && tag == Some(ReparseTag::Symlink);
        if is_symlink {
            return Self {
                is_directory: false,
                is_symlink: true,
                is_other: false,
            };
        }
        Self {
            is_directory: file_attributes & FILE_ATTRIBUTE_DIRECTORY != 0,
            is_symlink: false,
            is_other: file_attributes & (FILE_ATTRIBUTE_DEVICE | FILE_ATTRIBUTE_REPARSE_POINT) != 0,
        }
    }
}

/// Closed classification of a mount point directory entry, derived once per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    JunctionDirectory,
    PlainDirectory,
    Symlink,
    Other,
}

impl From<EntryAttributes> for EntryKind {
    fn from(attributes: EntryAttributes) -> Self {
        if attributes.is_other && attributes.is_directory {
            EntryKind::JunctionDirectory
        } else if attributes.is_directory {
            EntryKind::PlainDirectory
        } else if attributes.is_symlink {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        }
    }
}
