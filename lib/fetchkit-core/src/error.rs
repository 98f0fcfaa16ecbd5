//! Error types for fetchkit.
//!
//! Every invocation of [`crate::fetch`] ends in a value or in exactly one
//! [`Error`] variant. Transport and decoding failures are never surfaced
//! unwrapped: they travel as [`TransportError`] and [`DecodeError`] inside
//! the classified variant.

use std::fmt;

use derive_more::{Display, Error, From};

// ============================================================================
// Transport Error
// ============================================================================

/// Failure reported by a [`crate::Transport`] while performing a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransportError {
    /// Network/connection errors (refused, DNS, reset, body read).
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// The transport gave up waiting for a response.
    #[display("request timeout")]
    Timeout,

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// Too many redirects.
    #[display("too many redirects ({count} exceeded max of {max})")]
    TooManyRedirects {
        /// Number of redirects followed.
        count: usize,
        /// Maximum allowed redirects.
        max: usize,
    },

    /// Redirect response without a usable `Location`.
    #[display("invalid redirect: {_0}")]
    InvalidRedirect(#[error(not(source))] String),

    /// The transfer task ended without producing a result (it panicked or
    /// was cancelled).
    #[display("transfer aborted: {_0}")]
    Aborted(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid redirect error.
    #[must_use]
    pub fn invalid_redirect(message: impl Into<String>) -> Self {
        Self::InvalidRedirect(message.into())
    }

    /// Create an aborted transfer error.
    #[must_use]
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted(message.into())
    }

    /// Returns `true` if this is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// Decode Error
// ============================================================================

/// JSON parse or structural mapping failure, with the path of the offending field.
///
/// The path is empty for failures at the document root, such as syntax errors
/// detected before any field was entered. It is left out of the message then.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct DecodeError {
    path: String,
    message: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "at '{}': {}", self.path, self.message)
        }
    }
}

impl DecodeError {
    /// Create a decode error from a JSON path and a message.
    ///
    /// A root path (`.`) is stored as empty.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut path = path.into();
        if path == "." {
            path.clear();
        }
        Self {
            path,
            message: message.into(),
        }
    }

    /// JSON path to the error (e.g. `user.address.city`).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Message from the underlying deserializer.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Fieldless discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// See [`Error::InvalidUrl`].
    #[display("invalid URL")]
    InvalidUrl,
    /// See [`Error::RequestFailed`].
    #[display("request failed")]
    RequestFailed,
    /// See [`Error::NoData`].
    #[display("no data")]
    NoData,
    /// See [`Error::DecodingFailed`].
    #[display("decoding failed")]
    DecodingFailed,
}

/// Classified failure of a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum Error {
    /// The URL string could not be turned into a fetchable URL.
    ///
    /// No request is sent.
    #[display("invalid URL: {_0}")]
    #[from(skip)]
    InvalidUrl(#[error(not(source))] String),

    /// The transfer failed at the transport level.
    #[display("request failed: {_0}")]
    #[from]
    RequestFailed(TransportError),

    /// The transfer succeeded but the payload was empty.
    #[display("no data received")]
    #[from(skip)]
    NoData,

    /// The payload could not be decoded into the target type.
    #[display("decoding failed: {_0}")]
    #[from]
    DecodingFailed(DecodeError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl(reason.into())
    }

    /// The kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::RequestFailed(_) => ErrorKind::RequestFailed,
            Self::NoData => ErrorKind::NoData,
            Self::DecodingFailed(_) => ErrorKind::DecodingFailed,
        }
    }

    /// Returns `true` if the URL was rejected before any transfer.
    #[must_use]
    pub const fn is_invalid_url(&self) -> bool {
        matches!(self, Self::InvalidUrl(_))
    }

    /// Returns `true` if the payload was empty.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// The transport failure, if this is a [`Error::RequestFailed`].
    #[must_use]
    pub const fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::RequestFailed(err) => Some(err),
            _ => None,
        }
    }

    /// The decoding failure, if this is a [`Error::DecodingFailed`].
    #[must_use]
    pub const fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::DecodingFailed(err) => Some(err),
            _ => None,
        }
    }
}
