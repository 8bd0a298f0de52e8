//! Domain error types
//!
//! This module defines the failure taxonomy shared by the port adapters,
//! the reconcile use case and the scheduler: leaf fetch failures, control
//! API failures, port discovery failures and the per-cycle wrapper.

use thiserror::Error;

/// A single failed fetch: one HTTP exchange or one port-file read
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be sent, or no response arrived before the timeout
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed JSON, a missing field, or a file that could not be read
    #[error("decode error: {0}")]
    Decode(String),

    /// The server answered with a status other than 200 OK
    #[error("bad response: {status}")]
    BadResponse {
        /// Numeric HTTP status code
        code: u16,
        /// Status line text, e.g. `403 Forbidden`
        status: String,
    },
}

impl FetchError {
    /// Builds a transport error carrying `err` and its whole source chain
    pub fn transport(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Transport(message)
    }

    /// Returns true when the server rejected the request as unauthenticated
    ///
    /// qBittorrent answers `403 Forbidden` once its session cookie expires.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::BadResponse { code: 401 | 403, .. })
    }
}

/// Errors returned by the torrent application's control session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The exchange itself failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The server answered 200 but did not accept the credentials
    #[error("login failed")]
    LoginFailed,

    /// The configured base URL cannot address the control API
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A request body could not be serialized
    #[error("encode error: {0}")]
    Encode(String),
}

impl ClientError {
    /// Returns true for rejected credentials, which no retry can fix
    pub fn is_login_failed(&self) -> bool {
        matches!(self, Self::LoginFailed)
    }

    /// Returns true when the session must log in again
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_unauthenticated())
    }
}

/// Errors returned while discovering the forwarded port
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The gateway API failed and no port file is configured
    #[error("gateway query failed: {0}")]
    Gateway(FetchError),

    /// No gateway API is configured and the port file failed
    #[error("port file read failed: {0}")]
    File(FetchError),

    /// Both sources were tried and both failed
    #[error("gateway query failed: {gateway}; port file read failed: {file}")]
    Both {
        /// Failure from the gateway API
        gateway: FetchError,
        /// Failure from the port file
        file: FetchError,
    },

    /// Neither a gateway address nor a port file is configured
    #[error("no port source configured")]
    NotConfigured,
}

impl DiscoveryError {
    /// The gateway API failure, if the API was attempted
    pub fn gateway_error(&self) -> Option<&FetchError> {
        match self {
            Self::Gateway(e) | Self::Both { gateway: e, .. } => Some(e),
            _ => None,
        }
    }

    /// The port file failure, if the file was attempted
    pub fn file_error(&self) -> Option<&FetchError> {
        match self {
            Self::File(e) | Self::Both { file: e, .. } => Some(e),
            _ => None,
        }
    }
}

/// Failure of one reconciliation cycle
///
/// Wraps the underlying error unchanged so the scheduler can classify it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Control(#[from] ClientError),
}

impl CycleError {
    /// Returns true when the control session has lost its authentication
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Control(e) if e.is_unauthenticated())
    }
}
