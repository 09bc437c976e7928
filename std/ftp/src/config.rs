//! Connection settings for the single FTP endpoint this server talks to.

use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// Default FTP control port.
pub const DEFAULT_PORT: u16 = 21;

/// Errors raised while loading [`FtpConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `FTP_PORT` is not a valid TCP port.
    #[error("invalid FTP_PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Immutable connection settings, loaded once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Upgrade the control channel with explicit FTPS (`AUTH TLS`).
    pub secure: bool,
}

impl FtpConfig {
    /// Load the configuration from the process environment.
    ///
    /// Reads `FTP_HOST`, `FTP_PORT`, `FTP_USER`, `FTP_PASSWORD` and
    /// `FTP_SECURE`. See [`FtpConfig::from_lookup`] for defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables fall back to `localhost:21`, user
    /// `anonymous` and an empty password. `FTP_SECURE` enables TLS only when
    /// it equals `true`, ignoring case.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = match var("FTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value: raw, source })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: var("FTP_HOST").unwrap_or_else(|| "localhost".into()),
            port,
            user: var("FTP_USER").unwrap_or_else(|| "anonymous".into()),
            password: var("FTP_PASSWORD").unwrap_or_default(),
            secure: var("FTP_SECURE").is_some_and(|v| v.eq_ignore_ascii_case("true")),
        })
    }

    /// `ftp://host:port` or `ftps://host:port`, for logs and server info.
    pub fn endpoint(&self) -> String {
        let scheme = if self.secure { "ftps" } else { "ftp" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: DEFAULT_PORT,
            user: "anonymous".into(),
            password: String::new(),
            secure: false,
        }
    }
}

impl fmt::Debug for FtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("secure", &self.secure)
            .finish()
    }
}
