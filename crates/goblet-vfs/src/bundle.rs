//! Producer-side bundle format.
//!
//! A generator hands over a directory table and a flat list of records. The
//! pair can travel as a single postcard blob, typically embedded with
//! `include_bytes!` and decoded once at startup.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::VfsResult;
use super::fs::{DirTable, FileSystem, FileTable};
use super::types::File;

/// Generator output: directory listings plus file records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Directory path → child names, in generator order.
    pub dirs: DirTable,
    /// Every file and directory record.
    pub files: Vec<File>,
}

impl Bundle {
    pub fn new(dirs: DirTable, files: Vec<File>) -> Self {
        Self { dirs, files }
    }

    /// Encode as postcard.
    pub fn encode(&self) -> VfsResult<Vec<u8>> {
        Ok(postcard::to_stdvec(self)?)
    }

    /// Decode a postcard blob.
    pub fn decode(bytes: &[u8]) -> VfsResult<Self> {
        let bundle: Bundle = postcard::from_bytes(bytes)?;
        tracing::debug!(
            dirs = bundle.dirs.len(),
            files = bundle.files.len(),
            "decoded bundle"
        );
        Ok(bundle)
    }

    /// Index records by path and build a filesystem.
    ///
    /// A later record with a duplicate path replaces an earlier one.
    pub fn into_fs(self) -> FileSystem {
        let files: FileTable = self
            .files
            .into_iter()
            .map(|file| (file.path.clone(), Arc::new(file)))
            .collect();
        FileSystem::new(self.dirs, files)
    }
}
