//! Local transfer artifacts.
//!
//! Uploads and downloads pass through a uniquely named file in the artifact
//! directory. An [`Artifact`] removes its file when dropped unless it was
//! explicitly [kept](Artifact::keep).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory name used under the system temp dir when none is configured.
pub const DEFAULT_DIR_NAME: &str = "mcp-ftp-temp";

/// Default artifact directory: `<system temp>/mcp-ftp-temp`.
pub fn default_dir() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DIR_NAME)
}

/// Last non-empty segment of a remote path, or `file` for paths like `/`.
pub fn base_name(remote_path: &str) -> &str {
    remote_path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("file")
}

/// `<prefix>-<millis>-<base name>`.
///
/// Two calls in the same millisecond only collide when they share a base
/// name.
pub fn file_name(prefix: &str, millis: i64, remote_path: &str) -> String {
    format!("{prefix}-{millis}-{}", base_name(remote_path))
}

/// A local file scoped to one transfer.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    keep: bool,
}

impl Artifact {
    /// Reserve a new artifact path in `dir`, creating the directory if needed.
    ///
    /// The file itself is not created until something writes to it.
    pub fn new(dir: &Path, prefix: &str, remote_path: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let millis = chrono::Utc::now().timestamp_millis();
        Ok(Self {
            path: dir.join(file_name(prefix, millis, remote_path)),
            keep: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to the artifact file.
    pub fn write(&self, contents: &[u8]) -> io::Result<()> {
        fs::write(&self.path, contents)
    }

    /// Disarm cleanup and hand the file over to the caller.
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed transfer artifact"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove transfer artifact")
            }
        }
    }
}
