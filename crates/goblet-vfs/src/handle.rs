//! Open file handles.
//!
//! A [`Handle`] owns a reference to its record and to the shared tables, so
//! it can outlive the [`FileSystem`](crate::FileSystem) value that opened
//! it. Content is already in memory: every read and seek completes
//! immediately, including through the tokio traits.

use std::io::{self, Read, Seek, SeekFrom};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::SystemTime;

use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};

use super::error::{VfsError, VfsResult};
use super::fs::Tables;
use super::path::clean_join;
use super::types::{File, FileAttr};

/// Readable, seekable view over one record.
#[derive(Debug, Clone)]
pub struct Handle {
    /// Resolved table key.
    key: String,
    file: Arc<File>,
    tables: Arc<Tables>,
    /// Read position in bytes.
    pos: u64,
    /// Index into the directory listing for `read_dir`.
    dir_cursor: usize,
}

impl Handle {
    pub(crate) fn new(key: String, file: Arc<File>, tables: Arc<Tables>) -> Self {
        Self {
            key,
            file,
            tables,
            pos: 0,
            dir_cursor: 0,
        }
    }

    /// The resolved table key this handle was opened with.
    pub fn path(&self) -> &str {
        &self.key
    }

    /// The underlying record.
    pub fn record(&self) -> &Arc<File> {
        &self.file
    }

    pub fn stat(&self) -> FileAttr {
        self.file.attr()
    }

    pub fn modified(&self) -> SystemTime {
        self.file.modified_at
    }

    /// Content length in bytes.
    pub fn len(&self) -> u64 {
        self.file.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_dir(&self) -> bool {
        self.file.is_dir()
    }

    /// Current read position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Enumerate directory children.
    ///
    /// `None` returns every remaining entry. `Some(n)` returns at most `n`
    /// and advances the cursor, so repeated calls page through the listing;
    /// an exhausted cursor yields an empty `Vec`. Children that are listed
    /// but have no file record are skipped.
    pub fn read_dir(&mut self, limit: Option<usize>) -> VfsResult<Vec<FileAttr>> {
        if !self.file.is_dir() {
            return Err(VfsError::not_a_directory(self.key.as_str()));
        }
        let Some(names) = self.tables.dirs.get(&self.key) else {
            return Ok(Vec::new());
        };

        let limit = limit.unwrap_or(usize::MAX);
        let mut entries = Vec::new();
        while entries.len() < limit && self.dir_cursor < names.len() {
            let name = &names[self.dir_cursor];
            self.dir_cursor += 1;

            let child = clean_join(&self.key, name);
            match self.tables.files.get(&child) {
                Some(file) => entries.push(file.attr()),
                None => tracing::trace!(dir = %self.key, name = %name, "listed child has no record"),
            }
        }
        Ok(entries)
    }

    fn remaining(&self) -> &[u8] {
        let content = self.file.content();
        let start = usize::try_from(self.pos)
            .unwrap_or(usize::MAX)
            .min(content.len());
        &content[start..]
    }

    fn seek_to(&mut self, target: SeekFrom) -> io::Result<u64> {
        let next = match target {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(offset) => self.len().checked_add_signed(offset),
            SeekFrom::Current(offset) => self.pos.checked_add_signed(offset),
        };
        match next {
            Some(pos) => {
                self.pos = pos;
                Ok(pos)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}

impl Read for Handle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for Handle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seek_to(pos)
    }
}

impl AsyncRead for Handle {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let remaining = this.remaining();
        let n = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..n]);
        this.pos += n as u64;
        Poll::Ready(Ok(()))
    }
}

impl AsyncSeek for Handle {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        self.get_mut().seek_to(position).map(|_| ())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(Ok(self.pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::tests::fixture;
    use crate::FileSystem;

    fn fs() -> FileSystem {
        let (dirs, files) = fixture();
        FileSystem::new(dirs, files)
    }

    #[test]
    fn test_read_and_seek() {
        let mut handle = fs().open("/tmp/test/hoge.txt").unwrap();
        assert_eq!(handle.len(), 8);

        let mut buf = [0u8; 4];
        handle.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hoge");
        assert_eq!(handle.position(), 4);

        handle.seek(SeekFrom::End(-2)).unwrap();
        let mut rest = Vec::new();
        handle.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"ge");

        handle.seek(SeekFrom::Start(0)).unwrap();
        handle.seek(SeekFrom::Current(1)).unwrap();
        let mut rest = String::new();
        handle.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "ogehoge");
    }

    #[test]
    fn test_seek_past_end_reads_nothing() {
        let mut handle = fs().open("/tmp/test/fuga.txt").unwrap();
        assert_eq!(handle.seek(SeekFrom::Start(100)).unwrap(), 100);
        let mut buf = [0u8; 8];
        assert_eq!(handle.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_seek_negative_fails() {
        let mut handle = fs().open("/tmp/test/fuga.txt").unwrap();
        let err = handle.seek(SeekFrom::Current(-1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(handle.position(), 0);
    }

    #[test]
    fn test_stat_and_modified() {
        let fs = fs();
        let handle = fs.open("/tmp/test/fuga.txt").unwrap();
        let stat = handle.stat();
        assert_eq!(stat.name, "fuga.txt");
        assert_eq!(stat.size, 4);
        assert_eq!(handle.modified(), fs.file("/tmp/test/fuga.txt").unwrap().modified_at);
        assert_eq!(handle.path(), "/tmp/test/fuga.txt");
    }

    #[test]
    fn test_read_dir_all_skips_missing() {
        let mut dir = fs().open("/tmp/test").unwrap();
        assert!(dir.is_dir());

        let names: Vec<_> = dir
            .read_dir(None)
            .unwrap()
            .into_iter()
            .map(|attr| attr.name)
            .collect();
        assert_eq!(names, ["hoge.txt", "fuga.txt"]);

        assert!(dir.read_dir(None).unwrap().is_empty());
    }

    #[test]
    fn test_read_dir_pages() {
        let mut dir = fs().open("/tmp/test").unwrap();

        let first = dir.read_dir(Some(1)).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "hoge.txt");

        let second = dir.read_dir(Some(5)).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "fuga.txt");

        assert!(dir.read_dir(Some(1)).unwrap().is_empty());
    }

    #[test]
    fn test_read_dir_on_file_fails() {
        let mut handle = fs().open("/tmp/test/hoge.txt").unwrap();
        assert!(matches!(
            handle.read_dir(None),
            Err(VfsError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_directory_reads_empty() {
        let mut dir = fs().open("/tmp/test").unwrap();
        let mut buf = Vec::new();
        assert_eq!(dir.read_to_end(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_len_and_is_empty() {
        let fs = fs();
        let dir = fs.open("/tmp/test").unwrap();
        assert_eq!(dir.len(), 0);
        assert!(dir.is_empty());

        let file = fs.open("/tmp/test/hoge.txt").unwrap();
        assert_eq!(file.len(), 8);
        assert!(!file.is_empty());
    }

    #[test]
    fn test_handle_outlives_filesystem() {
        let handle = {
            let fs = fs();
            fs.open("/tmp/test/hoge.txt").unwrap()
        };
        assert_eq!(handle.record().content(), b"hogehoge");
    }
}
