//! Per-entry metadata snapshot
//!
//! This module provides the metadata record taken for every visited entry,
//! together with the entry kinds understood by `-type`.

use std::fs::{FileType, Metadata};
use std::os::unix::fs::{FileTypeExt, MetadataExt};

use crate::errors::{FindError, FindResult};

/// Supported entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Block device
    BlockDevice,
    /// Character device
    CharDevice,
    /// Directory
    Directory,
    /// Named pipe
    Fifo,
    /// Regular file
    File,
    /// Symbolic link
    SymbolicLink,
    /// Unix domain socket
    Socket,
}

impl EntryKind {
    /// All kinds, in `-type` letter order (`b c d p f l s`)
    pub const ALL: [EntryKind; 7] = [
        EntryKind::BlockDevice,
        EntryKind::CharDevice,
        EntryKind::Directory,
        EntryKind::Fifo,
        EntryKind::File,
        EntryKind::SymbolicLink,
        EntryKind::Socket,
    ];

    /// Parse a `-type` argument. Only a single letter is accepted.
    pub fn from_type_code(code: &str) -> FindResult<Self> {
        let kind = match code {
            "b" => EntryKind::BlockDevice,
            "c" => EntryKind::CharDevice,
            "d" => EntryKind::Directory,
            "p" => EntryKind::Fifo,
            "f" => EntryKind::File,
            "l" => EntryKind::SymbolicLink,
            "s" => EntryKind::Socket,
            _ => return Err(FindError::InvalidFileType(code.to_string())),
        };
        Ok(kind)
    }

    /// The `-type` letter for this kind
    pub fn type_code(self) -> char {
        match self {
            EntryKind::BlockDevice => 'b',
            EntryKind::CharDevice => 'c',
            EntryKind::Directory => 'd',
            EntryKind::Fifo => 'p',
            EntryKind::File => 'f',
            EntryKind::SymbolicLink => 'l',
            EntryKind::Socket => 's',
        }
    }

    /// Map a std file type onto a kind; `None` for anything unrecognized.
    pub fn from_file_type(file_type: FileType) -> Option<Self> {
        if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() {
            Some(EntryKind::File)
        } else if file_type.is_symlink() {
            Some(EntryKind::SymbolicLink)
        } else if file_type.is_block_device() {
            Some(EntryKind::BlockDevice)
        } else if file_type.is_char_device() {
            Some(EntryKind::CharDevice)
        } else if file_type.is_fifo() {
            Some(EntryKind::Fifo)
        } else if file_type.is_socket() {
            Some(EntryKind::Socket)
        } else {
            None
        }
    }
}

/// Read-only snapshot of one entry's metadata.
///
/// Taken fresh for every visited entry and dropped once the entry has been
/// processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Inode number
    pub ino: u64,
    /// Entry kind, `None` when the type bits are not recognized
    pub kind: Option<EntryKind>,
    /// Permission bits (`mode & 0o7777`)
    pub mode: u32,
    /// Hard link count
    pub nlink: u64,
    /// Owning user id
    pub uid: u32,
    /// Owning group id
    pub gid: u32,
    /// Size in bytes
    pub size: u64,
    /// Modification time, seconds since the epoch
    pub mtime: i64,
    /// Allocated blocks in 512-byte units
    pub blocks: u64,
}

impl EntryMetadata {
    pub fn is_dir(&self) -> bool {
        self.kind == Some(EntryKind::Directory)
    }

    /// ls-style permission string, e.g. `drwxr-xr-x`.
    ///
    /// The first column only distinguishes directories from everything else.
    pub fn permissions(&self) -> String {
        let mut bits = String::with_capacity(10);
        bits.push(if self.is_dir() { 'd' } else { '-' });
        for shift in [6, 3, 0] {
            let triad = (self.mode >> shift) & 0o7;
            bits.push(if triad & 0o4 != 0 { 'r' } else { '-' });
            bits.push(if triad & 0o2 != 0 { 'w' } else { '-' });
            bits.push(if triad & 0o1 != 0 { 'x' } else { '-' });
        }
        bits
    }

    /// Allocated size in 1024-byte blocks
    pub fn kilobyte_blocks(&self) -> u64 {
        self.blocks / 2
    }
}

impl From<&Metadata> for EntryMetadata {
    fn from(metadata: &Metadata) -> Self {
        Self {
            ino: metadata.ino(),
            kind: EntryKind::from_file_type(metadata.file_type()),
            mode: metadata.mode() & 0o7777,
            nlink: metadata.nlink(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size(),
            mtime: metadata.mtime(),
            blocks: metadata.blocks(),
        }
    }
}

#[cfg(test)]
impl EntryMetadata {
    /// Fixed metadata for in-memory trees
    pub(crate) fn fixture(kind: EntryKind) -> Self {
        Self {
            ino: 1,
            kind: Some(kind),
            mode: if kind == EntryKind::Directory { 0o755 } else { 0o644 },
            nlink: 1,
            uid: 1000,
            gid: 1000,
            size: 0,
            mtime: 0,
            blocks: 0,
        }
    }
}
