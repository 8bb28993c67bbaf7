//! Unified error type.

use thiserror::Error;

use crate::method::Method;

/// The error type returned by khan's fallible operations.
///
/// Dispatch never fails: a missing path or method is an ordinary
/// [`Response`](crate::Response) produced by a fallback handler. `Error`
/// covers the two things that can go wrong while a route table is being
/// assembled, plus the server's infrastructure failures.
#[derive(Debug, Error)]
pub enum Error {
    /// The raw path contained whitespace.
    #[error("invalid pattern `{0}`: whitespace is not allowed")]
    InvalidPattern(String),

    /// The (pattern, method) pair is already taken.
    #[error("route `{method} {pattern}` already exists")]
    DuplicateRoute { method: Method, pattern: String },

    /// `Server::bind` was given something that is not `host:port`.
    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// `true` for registration-time failures.
    ///
    /// These mean the route table itself is wrong. Hosts normally abort
    /// startup on them instead of serving a partial table.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidPattern(_) | Self::DuplicateRoute { .. })
    }
}

/// Result alias for khan operations.
pub type Result<T> = std::result::Result<T, Error>;
