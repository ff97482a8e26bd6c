use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a candidate server URL was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyUrl,
    MalformedUrl,
    UnsupportedScheme,
    ConnectionFailed,
    ServerError,
    NotACompatibleServer,
}

impl ErrorKind {
    /// Message shown next to the URL field.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::EmptyUrl => "Server URL cannot be empty",
            ErrorKind::MalformedUrl => "Invalid URL format",
            ErrorKind::UnsupportedScheme => "Server URL must use HTTP or HTTPS protocol",
            ErrorKind::ConnectionFailed => "Failed to connect to server",
            ErrorKind::ServerError => "Server returned an error",
            ErrorKind::NotACompatibleServer => "Not a valid Happy Server",
        }
    }

    /// Syntactic errors are decided locally without any I/O.
    pub fn is_syntactic(self) -> bool {
        matches!(
            self,
            ErrorKind::EmptyUrl | ErrorKind::MalformedUrl | ErrorKind::UnsupportedScheme
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum ServerUrlError {
    #[error("Server URL cannot be empty")]
    EmptyUrl,

    #[error("Invalid URL format: {0}")]
    MalformedUrl(#[from] url::ParseError),

    #[error("Server URL must use HTTP or HTTPS protocol, got {0:?}")]
    UnsupportedScheme(String),

    #[error("Failed to connect to server: {0}")]
    ConnectionFailed(#[from] reqwest::Error),

    #[error("Server returned an error: {0}")]
    ServerError(reqwest::StatusCode),

    #[error("Not a valid Happy Server")]
    NotACompatibleServer,
}

impl ServerUrlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerUrlError::EmptyUrl => ErrorKind::EmptyUrl,
            ServerUrlError::MalformedUrl(_) => ErrorKind::MalformedUrl,
            ServerUrlError::UnsupportedScheme(_) => ErrorKind::UnsupportedScheme,
            ServerUrlError::ConnectionFailed(_) => ErrorKind::ConnectionFailed,
            ServerUrlError::ServerError(_) => ErrorKind::ServerError,
            ServerUrlError::NotACompatibleServer => ErrorKind::NotACompatibleServer,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error accessing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse store file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}
