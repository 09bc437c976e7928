//! Error types for FTP sessions.
//!
//! Every session operation fails with a single [`Error`] carrying the
//! [`Operation`] that was attempted and the underlying [`Fault`]. The
//! rendered message is what the calling agent sees.

use std::fmt;
use thiserror::Error;

/// The remote operation a session was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Download,
    Upload,
    CreateDirectory,
    DeleteFile,
    DeleteDirectory,
}

impl Operation {
    /// Human-readable verb phrase used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list directory",
            Operation::Download => "download file",
            Operation::Upload => "upload file",
            Operation::CreateDirectory => "create directory",
            Operation::DeleteFile => "delete file",
            Operation::DeleteDirectory => "delete directory",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong underneath an [`Operation`].
#[derive(Error, Debug)]
pub enum Fault {
    /// DNS failure, refused connection, TLS handshake or login rejection.
    #[error("failed to connect to FTP server: {0}")]
    Connect(String),
    /// The server rejected the request (not found, permission, not empty).
    #[error("{0}")]
    Protocol(String),
    /// Reading, writing or removing a local transfer artifact failed.
    #[error("local I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The blocking worker running the session did not complete.
    #[error("session worker failed: {0}")]
    Task(String),
}

impl From<suppaftp::FtpError> for Fault {
    fn from(err: suppaftp::FtpError) -> Self {
        Fault::Protocol(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Fault {
    fn from(err: tokio::task::JoinError) -> Self {
        Fault::Task(err.to_string())
    }
}

/// A failed session operation.
#[derive(Error, Debug)]
#[error("Failed to {operation}: {fault}")]
pub struct Error {
    pub operation: Operation,
    #[source]
    pub fault: Fault,
}

impl Error {
    pub fn new(operation: Operation, fault: impl Into<Fault>) -> Self {
        Self {
            operation,
            fault: fault.into(),
        }
    }
}
