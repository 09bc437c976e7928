//! Scoped FTP sessions.
//!
//! A [`Connector`] opens an authenticated connection and hands back a
//! [`RemoteFs`]. [`Session`] owns that connection for the duration of one
//! operation and sends `QUIT` when it goes out of scope, on every exit path.

use crate::config::FtpConfig;
use crate::error::Fault;
use crate::listing::DirEntry;
use std::fmt;
use std::io::Read;
use suppaftp::native_tls::TlsConnector;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream, NativeTlsConnector, NativeTlsFtpStream};

/// The remote operations a session can perform.
///
/// Paths are passed through to the server verbatim. Implementations are
/// blocking.
pub trait RemoteFs {
    /// List a directory, in server order.
    fn list_entries(&mut self, path: &str) -> Result<Vec<DirEntry>, Fault>;

    /// Fetch a whole file into memory.
    fn retrieve(&mut self, path: &str) -> Result<Vec<u8>, Fault>;

    /// Store everything readable from `reader` at `path`.
    fn store(&mut self, path: &str, reader: &mut dyn Read) -> Result<u64, Fault>;

    fn change_dir(&mut self, path: &str) -> Result<(), Fault>;

    fn make_dir(&mut self, path: &str) -> Result<(), Fault>;

    fn remove_file(&mut self, path: &str) -> Result<(), Fault>;

    /// Remove an empty directory.
    fn remove_dir(&mut self, path: &str) -> Result<(), Fault>;

    /// End the session.
    fn close(&mut self) -> Result<(), Fault>;
}

/// Opens connections to the configured endpoint.
pub trait Connector: fmt::Debug + Send + Sync {
    fn connect(&self, config: &FtpConfig) -> Result<Box<dyn RemoteFs>, Fault>;
}

fn connect_fault(err: FtpError) -> Fault {
    Fault::Connect(err.to_string())
}

/// [`Connector`] backed by `suppaftp`, with explicit FTPS when
/// [`FtpConfig::secure`] is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct FtpConnector;

impl Connector for FtpConnector {
    fn connect(&self, config: &FtpConfig) -> Result<Box<dyn RemoteFs>, Fault> {
        let addr = (config.host.as_str(), config.port);
        if config.secure {
            let tls = TlsConnector::new().map_err(|e| Fault::Connect(e.to_string()))?;
            let mut stream = NativeTlsFtpStream::connect(addr)
                .map_err(connect_fault)?
                .into_secure(NativeTlsConnector::from(tls), &config.host)
                .map_err(connect_fault)?;
            stream
                .login(config.user.as_str(), config.password.as_str())
                .map_err(connect_fault)?;
            stream.transfer_type(FileType::Binary).map_err(connect_fault)?;
            Ok(Box::new(stream))
        } else {
            let mut stream = FtpStream::connect(addr).map_err(connect_fault)?;
            stream
                .login(config.user.as_str(), config.password.as_str())
                .map_err(connect_fault)?;
            stream.transfer_type(FileType::Binary).map_err(connect_fault)?;
            Ok(Box::new(stream))
        }
    }
}

macro_rules! impl_remote_fs {
    ($stream:ty) => {
        impl RemoteFs for $stream {
            fn list_entries(&mut self, path: &str) -> Result<Vec<DirEntry>, Fault> {
                let pathname = (!path.is_empty()).then_some(path);
                let lines = self.list(pathname)?;
                Ok(lines
                    .iter()
                    .filter_map(|line| {
                        let entry = DirEntry::parse(line);
                        if entry.is_none() {
                            tracing::debug!(line = %line, "skipping unparsable LIST line");
                        }
                        entry
                    })
                    .collect())
            }

            fn retrieve(&mut self, path: &str) -> Result<Vec<u8>, Fault> {
                Ok(self.retr_as_buffer(path)?.into_inner())
            }

            fn store(&mut self, path: &str, mut reader: &mut dyn Read) -> Result<u64, Fault> {
                Ok(self.put_file(path, &mut reader)?)
            }

            fn change_dir(&mut self, path: &str) -> Result<(), Fault> {
                Ok(self.cwd(path)?)
            }

            fn make_dir(&mut self, path: &str) -> Result<(), Fault> {
                Ok(self.mkdir(path)?)
            }

            fn remove_file(&mut self, path: &str) -> Result<(), Fault> {
                Ok(self.rm(path)?)
            }

            fn remove_dir(&mut self, path: &str) -> Result<(), Fault> {
                Ok(self.rmdir(path)?)
            }

            fn close(&mut self) -> Result<(), Fault> {
                Ok(self.quit()?)
            }
        }
    };
}

impl_remote_fs!(FtpStream);
impl_remote_fs!(NativeTlsFtpStream);

/// One connect → operate → disconnect cycle.
pub struct Session {
    remote: Box<dyn RemoteFs>,
}

impl Session {
    /// Connect and log in. Nothing needs releasing if this fails.
    pub fn open(connector: &dyn Connector, config: &FtpConfig) -> Result<Self, Fault> {
        tracing::debug!(endpoint = %config.endpoint(), "opening FTP session");
        let remote = connector.connect(config)?;
        Ok(Self { remote })
    }

    pub fn remote(&mut self) -> &mut dyn RemoteFs {
        self.remote.as_mut()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Best effort: the socket closes with the stream regardless.
        if let Err(e) = self.remote.close() {
            tracing::debug!(error = %e, "QUIT failed while closing FTP session");
        }
    }
}
