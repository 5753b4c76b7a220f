//! Error definitions
//!
//! This module provides the error type shared by streams, counters and
//! completion handlers.

use std::io;

use thiserror::Error;

/// Main error type for fail-stream
///
/// The type is `Clone` so a [`FaultCounter`](crate::chaos::FaultCounter) can
/// hand out the same configured value on every injected failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Default error injected by a fault counter
    #[error("Injected test failure")]
    TestFailure,

    /// Injected failure with a custom description
    #[error("Injected failure: {0}")]
    InjectedFailure(String),

    /// Error reported by a wrapped transport
    #[error("I/O error ({kind:?}): {message}")]
    Io {
        /// Kind of the underlying I/O error.
        kind: io::ErrorKind,
        /// Message of the underlying I/O error.
        message: String,
    },

    /// The stream was torn down
    #[error("Stream closed")]
    Closed,
}

impl Error {
    /// Create an injected failure error.
    #[must_use]
    pub fn injected_failure(message: impl Into<String>) -> Self {
        Self::InjectedFailure(message.into())
    }

    /// Create an I/O error of the given kind.
    #[must_use]
    pub fn io(kind: io::ErrorKind, message: impl Into<String>) -> Self {
        Self::Io {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if this error was produced by fault injection.
    #[must_use]
    pub fn is_injected(&self) -> bool {
        matches!(self, Self::TestFailure | Self::InjectedFailure(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io { kind, message } => io::Error::new(kind, message),
            Error::Closed => io::Error::new(io::ErrorKind::NotConnected, err),
            other => io::Error::other(other),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
