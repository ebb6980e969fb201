//! The read-only embedded filesystem.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use super::config::MountConfig;
use super::error::{VfsError, VfsResult};
use super::handle::Handle;
use super::path::{clean_join, clean_rooted};
use super::types::{File, FileAttr};

/// Directory path → immediate child names, in producer order.
pub type DirTable = HashMap<String, Vec<String>>;

/// Absolute path → file record.
pub type FileTable = HashMap<String, Arc<File>>;

/// The two immutable tables backing a [`FileSystem`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tables {
    pub dirs: DirTable,
    pub files: FileTable,
}

/// Read-only virtual filesystem over pre-baked tables.
///
/// A `FileSystem` is a thin view: the tables sit behind an `Arc` and every
/// derived instance ([`with_prefix`](Self::with_prefix),
/// [`with_ignored_prefix`](Self::with_ignored_prefix)) shares them. Nothing
/// is mutated after construction, so a value can be shared across threads
/// freely.
///
/// `FileSystem::default()` has no tables attached. Lookups on it miss, and
/// deriving from it fails with [`VfsError::InvalidReceiver`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSystem {
    tables: Option<Arc<Tables>>,
    /// Stripped from the front of incoming paths.
    path_prefix: String,
    /// Joined in front of incoming paths.
    ignored_prefix: String,
}

impl FileSystem {
    /// Create a filesystem over the given tables, with no prefixes.
    ///
    /// Table contents are trusted as-is; no consistency checks are made.
    pub fn new(dirs: DirTable, files: FileTable) -> Self {
        Self::from_tables(Arc::new(Tables { dirs, files }))
    }

    /// Create a filesystem over already-shared tables.
    pub fn from_tables(tables: Arc<Tables>) -> Self {
        Self {
            tables: Some(tables),
            path_prefix: String::new(),
            ignored_prefix: String::new(),
        }
    }

    /// Returns true if tables are attached.
    pub fn is_initialized(&self) -> bool {
        self.tables.is_some()
    }

    /// The backing tables, if attached.
    pub fn tables(&self) -> Option<&Arc<Tables>> {
        self.tables.as_ref()
    }

    /// Returns true if both values view the same table allocation.
    pub fn shares_tables(&self, other: &FileSystem) -> bool {
        match (&self.tables, &other.tables) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    pub fn ignored_prefix(&self) -> &str {
        &self.ignored_prefix
    }

    /// Derive a view mounted under `prefix`.
    ///
    /// Incoming paths starting with `prefix` have it stripped before lookup,
    /// so `/static/css/app.css` finds the `/css/app.css` key when mounted at
    /// `/static`. The receiver is left untouched, and any ignored prefix it
    /// carries is cleared on the result.
    pub fn with_prefix(&self, prefix: impl Into<String>) -> VfsResult<FileSystem> {
        let tables = self.require_tables("with_prefix")?;
        Ok(Self {
            tables: Some(tables),
            path_prefix: prefix.into(),
            ignored_prefix: String::new(),
        })
    }

    /// Derive a view whose keys carry `prefix` that callers omit.
    ///
    /// Incoming paths are canonicalized as rooted, then joined below
    /// `prefix`, so `..` segments cannot climb out of it. The receiver is
    /// left untouched, and any path prefix it carries is cleared on the
    /// result.
    pub fn with_ignored_prefix(&self, prefix: impl Into<String>) -> VfsResult<FileSystem> {
        let tables = self.require_tables("with_ignored_prefix")?;
        Ok(Self {
            tables: Some(tables),
            path_prefix: String::new(),
            ignored_prefix: prefix.into(),
        })
    }

    /// Derive a view from a mount config.
    pub fn mount(&self, config: &MountConfig) -> VfsResult<FileSystem> {
        config.validate()?;
        match (&config.prefix, &config.ignored_prefix) {
            (Some(prefix), _) => self.with_prefix(prefix.as_str()),
            (None, Some(ignored)) => self.with_ignored_prefix(ignored.as_str()),
            (None, None) => self.require_tables("mount").map(|_| self.clone()),
        }
    }

    fn require_tables(&self, op: &'static str) -> VfsResult<Arc<Tables>> {
        match &self.tables {
            Some(tables) => Ok(Arc::clone(tables)),
            None => {
                tracing::error!(op, "prefix derivation on an uninitialized filesystem");
                Err(VfsError::InvalidReceiver)
            }
        }
    }

    /// Rewrite a caller path into a table key.
    ///
    /// A set path prefix is stripped when `path` starts with it. Otherwise a
    /// set ignored prefix is joined in front of the rooted, canonical form
    /// of `path`. With neither set, `path` is returned unchanged.
    pub fn resolve<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if !self.path_prefix.is_empty() {
            if let Some(rest) = path.strip_prefix(self.path_prefix.as_str()) {
                tracing::trace!(path, key = rest, "stripped path prefix");
                return Cow::Borrowed(rest);
            }
        }
        if !self.ignored_prefix.is_empty() {
            let key = clean_join(&self.ignored_prefix, &clean_rooted(path));
            tracing::trace!(path, key = %key, "joined ignored prefix");
            return Cow::Owned(key);
        }
        Cow::Borrowed(path)
    }

    fn lookup<'a>(&self, path: &'a str) -> VfsResult<(Cow<'a, str>, &Arc<File>)> {
        let key = self.resolve(path);
        let found = self
            .tables
            .as_ref()
            .and_then(|tables| tables.files.get(&*key));
        match found {
            Some(file) => Ok((key, file)),
            None => {
                tracing::debug!(path, key = %key, "file not found");
                Err(VfsError::not_found(key.into_owned()))
            }
        }
    }

    /// Returns true if the resolved path is in the file table.
    pub fn exists(&self, path: &str) -> bool {
        let key = self.resolve(path);
        self.tables
            .as_ref()
            .is_some_and(|tables| tables.files.contains_key(&*key))
    }

    /// Open a readable, seekable handle.
    ///
    /// Directory handles also enumerate children via [`Handle::read_dir`].
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn open(&self, path: &str) -> VfsResult<Handle> {
        let (key, file) = self.lookup(path)?;
        let file = Arc::clone(file);
        let tables = self
            .tables
            .clone()
            .ok_or_else(|| VfsError::not_found(&*key))?;
        Ok(Handle::new(key.into_owned(), file, tables))
    }

    /// The stored record itself, shared rather than copied.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn file(&self, path: &str) -> VfsResult<Arc<File>> {
        self.lookup(path).map(|(_, file)| Arc::clone(file))
    }

    /// Stat without opening.
    pub fn metadata(&self, path: &str) -> VfsResult<FileAttr> {
        self.lookup(path).map(|(_, file)| file.attr())
    }

    /// The stored content, byte for byte. Directory nodes read as empty.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn read_file(&self, path: &str) -> VfsResult<&[u8]> {
        self.lookup(path).map(|(_, file)| file.content())
    }

    /// Child names of a directory, in stored order.
    ///
    /// Names are returned as listed even when the file table lacks a
    /// matching entry.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn read_dir(&self, path: &str) -> VfsResult<&[String]> {
        let key = self.resolve(path);
        let found = self
            .tables
            .as_ref()
            .and_then(|tables| tables.dirs.get(&*key));
        match found {
            Some(children) => Ok(children.as_slice()),
            None => {
                tracing::debug!(path, key = %key, "directory not found");
                Err(VfsError::not_found(key.into_owned()))
            }
        }
    }
}
