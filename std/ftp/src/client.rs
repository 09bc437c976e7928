//! Per-call FTP operations.
//!
//! [`FtpClient`] holds only static configuration. Each operation opens its
//! own [`Session`] on a blocking worker, does one thing, and releases the
//! session before returning. Failures come back as a single [`Error`] naming
//! the operation.

use crate::artifact::{self, Artifact};
use crate::config::FtpConfig;
use crate::error::{Error, Fault, Operation};
use crate::listing::DirEntry;
use crate::session::{Connector, FtpConnector, RemoteFs, Session};
use std::path::PathBuf;
use std::sync::Arc;

/// A downloaded file.
#[derive(Debug, Clone)]
pub struct Download {
    /// Local copy of the remote file. Not removed by this crate.
    pub local_path: PathBuf,
    pub content: Vec<u8>,
}

/// Session wrapper around a single configured FTP endpoint.
#[derive(Debug, Clone)]
pub struct FtpClient {
    config: Arc<FtpConfig>,
    connector: Arc<dyn Connector>,
    artifact_dir: PathBuf,
}

impl FtpClient {
    /// Client speaking real FTP through [`FtpConnector`].
    pub fn new(config: FtpConfig) -> Self {
        Self::with_connector(config, FtpConnector)
    }

    pub fn with_connector(config: FtpConfig, connector: impl Connector + 'static) -> Self {
        Self {
            config: Arc::new(config),
            connector: Arc::new(connector),
            artifact_dir: artifact::default_dir(),
        }
    }

    /// Place transfer artifacts in `dir` instead of the system temp dir.
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    pub fn config(&self) -> &FtpConfig {
        &self.config
    }

    pub fn artifact_dir(&self) -> &std::path::Path {
        &self.artifact_dir
    }

    /// List `path` in server order.
    pub async fn list(&self, path: &str) -> Result<Vec<DirEntry>, Error> {
        let remote = path.to_string();
        self.run(Operation::List, path, move |fs| fs.list_entries(&remote))
            .await
    }

    /// Fetch `path` and keep a local copy in the artifact directory.
    pub async fn download(&self, path: &str) -> Result<Download, Error> {
        let remote = path.to_string();
        let dir = self.artifact_dir.clone();
        self.run(Operation::Download, path, move |fs| {
            let content = fs.retrieve(&remote)?;
            let artifact = Artifact::new(&dir, "download", &remote)?;
            artifact.write(&content)?;
            Ok(Download {
                local_path: artifact.keep(),
                content,
            })
        })
        .await
    }

    /// Store `content` at `path`, staging it through a local artifact that
    /// is removed whether or not the transfer succeeds.
    pub async fn upload(&self, path: &str, content: String) -> Result<(), Error> {
        let remote = path.to_string();
        let dir = self.artifact_dir.clone();
        self.run(Operation::Upload, path, move |fs| {
            let artifact = Artifact::new(&dir, "upload", &remote)?;
            artifact.write(content.as_bytes())?;
            let mut file = std::fs::File::open(artifact.path())?;
            let bytes = fs.store(&remote, &mut file)?;
            tracing::debug!(path = %remote, bytes, "stored file");
            Ok(())
        })
        .await
    }

    /// Make sure `path` exists, creating missing parents along the way.
    pub async fn create_directory(&self, path: &str) -> Result<(), Error> {
        let remote = path.to_string();
        self.run(Operation::CreateDirectory, path, move |fs| {
            ensure_dir(fs, &remote)
        })
        .await
    }

    pub async fn delete_file(&self, path: &str) -> Result<(), Error> {
        let remote = path.to_string();
        self.run(Operation::DeleteFile, path, move |fs| fs.remove_file(&remote))
            .await
    }

    /// Remove an empty directory. Non-empty directories are refused by the
    /// server.
    pub async fn delete_directory(&self, path: &str) -> Result<(), Error> {
        let remote = path.to_string();
        self.run(Operation::DeleteDirectory, path, move |fs| {
            fs.remove_dir(&remote)
        })
        .await
    }

    /// Open a session, run `op` against it and close it, all on a blocking
    /// worker.
    async fn run<T, F>(&self, operation: Operation, path: &str, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn RemoteFs) -> Result<T, Fault> + Send + 'static,
    {
        tracing::debug!(%operation, path, "starting FTP operation");
        let connector = Arc::clone(&self.connector);
        let config = Arc::clone(&self.config);
        let outcome = tokio::task::spawn_blocking(move || {
            let mut session = Session::open(connector.as_ref(), &config)?;
            op(session.remote())
        })
        .await;

        match outcome.map_err(Fault::from).and_then(|result| result) {
            Ok(value) => {
                tracing::debug!(%operation, path, "FTP operation succeeded");
                Ok(value)
            }
            Err(fault) => {
                let err = Error::new(operation, fault);
                tracing::error!(path, error = %err, "FTP operation failed");
                Err(err)
            }
        }
    }
}

/// Walk `path` one component at a time, creating what is missing.
fn ensure_dir(fs: &mut dyn RemoteFs, path: &str) -> Result<(), Fault> {
    if path.starts_with('/') {
        fs.change_dir("/")?;
    }
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if fs.change_dir(segment).is_err() {
            fs.make_dir(segment)?;
            fs.change_dir(segment)?;
        }
    }
    Ok(())
}
