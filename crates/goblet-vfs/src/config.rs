//! Mount configuration.
//!
//! Selects where an embedded bundle appears, written in RON:
//!
//! ```ron
//! (prefix: Some("/static"))
//! ```
//!
//! or, when table keys already carry a segment callers omit:
//!
//! ```ron
//! (ignored_prefix: Some("/public"))
//! ```

use serde::{Deserialize, Serialize};

use super::error::{VfsError, VfsResult};

/// Prefix mode for a mounted [`FileSystem`](crate::FileSystem).
///
/// At most one field may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// Stripped from incoming paths before lookup.
    pub prefix: Option<String>,
    /// Joined in front of incoming paths before lookup.
    pub ignored_prefix: Option<String>,
}

impl MountConfig {
    /// Parse a RON mount config.
    pub fn from_ron(text: &str) -> VfsResult<Self> {
        let config: MountConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> VfsResult<()> {
        if self.prefix.is_some() && self.ignored_prefix.is_some() {
            return Err(VfsError::ConflictingPrefixes);
        }
        Ok(())
    }
}
