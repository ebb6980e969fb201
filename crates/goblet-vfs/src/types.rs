//! Core VFS types.
//!
//! Records are produced once by a bundle generator and never mutated
//! afterwards. They serialize with serde so a bundle can travel as a
//! single postcard blob.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::SystemTime;

/// Permission bits plus a directory flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMode(pub u32);

impl FileMode {
    /// Directory flag (bit 31).
    pub const DIR: u32 = 1 << 31;

    /// Mask for the Unix permission bits.
    pub const PERM: u32 = 0o777;

    /// Mode for a regular file.
    pub fn file(perm: u32) -> Self {
        Self(perm & Self::PERM)
    }

    /// Mode for a directory.
    pub fn dir(perm: u32) -> Self {
        Self(Self::DIR | (perm & Self::PERM))
    }

    /// Returns true if the directory flag is set.
    pub fn is_dir(&self) -> bool {
        self.0 & Self::DIR != 0
    }

    /// Unix permissions (e.g., 0o644).
    pub fn perm(&self) -> u32 {
        self.0 & Self::PERM
    }

    /// Raw mode bits.
    pub fn bits(&self) -> u32 {
        self.0
    }
}

/// One regular file or directory node in an embedded bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Absolute path, also the file table key.
    pub path: String,
    /// Content bytes; `None` for directory nodes.
    pub data: Option<Cow<'static, [u8]>>,
    /// Permission bits plus directory flag.
    pub mode: FileMode,
    /// Modification time, used by consumers for cache validators.
    pub modified_at: SystemTime,
}

impl File {
    /// Create a regular file record.
    pub fn regular(
        path: impl Into<String>,
        data: impl Into<Cow<'static, [u8]>>,
        perm: u32,
        modified_at: SystemTime,
    ) -> Self {
        Self {
            path: path.into(),
            data: Some(data.into()),
            mode: FileMode::file(perm),
            modified_at,
        }
    }

    /// Create a directory record.
    pub fn directory(path: impl Into<String>, perm: u32, modified_at: SystemTime) -> Self {
        Self {
            path: path.into(),
            data: None,
            mode: FileMode::dir(perm),
            modified_at,
        }
    }

    /// Content bytes; empty for directories.
    pub fn content(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Content length in bytes.
    pub fn size(&self) -> u64 {
        self.content().len() as u64
    }

    /// Returns true if this record is a directory node.
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        match trimmed.rsplit_once('/') {
            Some((_, name)) if !name.is_empty() => name,
            _ if trimmed.is_empty() => "/",
            _ => trimmed,
        }
    }

    /// Stat-like view of this record.
    pub fn attr(&self) -> FileAttr {
        FileAttr {
            name: self.name().to_string(),
            size: self.size(),
            kind: if self.is_dir() {
                FileType::Directory
            } else {
                FileType::File
            },
            mode: self.mode,
            mtime: self.modified_at,
        }
    }
}

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// File attributes (metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttr {
    /// Entry name (not full path).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// File type.
    pub kind: FileType,
    /// Permission bits plus directory flag.
    pub mode: FileMode,
    /// Last modification time.
    pub mtime: SystemTime,
}

impl FileAttr {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_mode() {
        let file = FileMode::file(0o644);
        assert!(!file.is_dir());
        assert_eq!(file.perm(), 0o644);

        let dir = FileMode::dir(0o755);
        assert!(dir.is_dir());
        assert_eq!(dir.perm(), 0o755);
        assert_eq!(dir.bits(), 0x800001ed);
    }

    #[test]
    fn test_file_constructors() {
        let now = SystemTime::now();
        let file = File::regular("/tmp/test/hoge.txt", &b"hogehoge"[..], 0o644, now);
        assert_eq!(file.content(), b"hogehoge");
        assert_eq!(file.size(), 8);
        assert!(!file.is_dir());

        let dir = File::directory("/tmp/test", 0o755, now);
        assert!(dir.is_dir());
        assert!(dir.data.is_none());
        assert_eq!(dir.content(), b"");
    }

    #[test]
    fn test_name() {
        let now = SystemTime::now();
        assert_eq!(File::directory("/tmp/test", 0o755, now).name(), "test");
        assert_eq!(File::directory("/tmp/test/", 0o755, now).name(), "test");
        assert_eq!(File::directory("/", 0o755, now).name(), "/");
        assert_eq!(File::regular("rel.txt", Vec::<u8>::new(), 0o644, now).name(), "rel.txt");
    }

    #[test]
    fn test_attr() {
        let now = SystemTime::now();
        let attr = File::regular("/a/b.css", b"body{}".to_vec(), 0o600, now).attr();
        assert_eq!(attr.name, "b.css");
        assert_eq!(attr.size, 6);
        assert!(attr.is_file());
        assert_eq!(attr.mode.perm(), 0o600);
        assert_eq!(attr.mtime, now);

        let attr = File::directory("/a", 0o755, now).attr();
        assert!(attr.is_dir());
        assert_eq!(attr.size, 0);
    }
}
