//! # goblet-vfs
//!
//! Read-only virtual filesystem over pre-baked asset tables.
//!
//! A generator scans a directory ahead of time and produces two tables: a
//! directory table (path → ordered child names) and a file table (path →
//! record). [`FileSystem`] serves them as if they were a directory tree on
//! disk, without touching the real filesystem at request time.
//!
//! Key components:
//!
//! - [`FileSystem`] - Lookup, open, read, and list over shared tables
//! - [`Handle`] - `Read`/`Seek` (and tokio `AsyncRead`/`AsyncSeek`) over one record
//! - [`Bundle`] - Generator output, postcard-encodable for embedding
//! - [`MountConfig`] - RON-configured prefix mode
//!
//! ## Mounting
//!
//! The same tables can appear at different logical locations:
//!
//! - **Prefix**: callers send `/static/app.css`, tables hold `/app.css`.
//!   The prefix is stripped before lookup.
//! - **Ignored prefix**: callers send `/app.css`, tables hold
//!   `/public/app.css`. The prefix is joined in front and the result
//!   canonicalized (`.`/`..` resolved, separators collapsed).
//!
//! Derived views share the tables through an `Arc`; nothing is copied.
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use std::time::SystemTime;
//! use goblet_vfs::{File, FileSystem};
//!
//! let css = File::regular("/app.css", &b"body{}"[..], 0o644, SystemTime::now());
//! let files = HashMap::from([(css.path.clone(), Arc::new(css))]);
//! let fs = FileSystem::new(HashMap::new(), files);
//!
//! let mounted = fs.with_prefix("/static").unwrap();
//! assert_eq!(mounted.read_file("/static/app.css").unwrap(), b"body{}");
//! assert!(!fs.exists("/static/app.css"));
//! ```

mod bundle;
mod config;
mod error;
mod fs;
mod handle;
pub mod path;
mod types;

pub use bundle::Bundle;
pub use config::MountConfig;
pub use error::{VfsError, VfsResult};
pub use fs::{DirTable, FileSystem, FileTable, Tables};
pub use handle::Handle;
pub use types::{File, FileAttr, FileMode, FileType};
