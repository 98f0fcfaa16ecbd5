//! Core types and pure steps for the fetchkit fetch-and-decode helper.
//!
//! This crate provides everything that does not depend on a concrete HTTP stack:
//! - [`Error`], [`ErrorKind`] and [`Result`] - Outcome classification
//! - [`TransportError`] and [`DecodeError`] - Context carried by failures
//! - [`Request`] and [`Response`] - Transfer types exchanged with a transport
//! - [`Transport`] - Capability that performs a single GET
//! - [`parse_url`] - URL validation step
//! - [`decode`] - JSON decoding step
//! - [`fetch`] - The whole operation over any [`Transport`]

mod decode;
mod error;
mod fetch;
pub mod prelude;
mod request;
mod response;
mod transport;
mod validate;

pub use decode::decode;
pub use error::{DecodeError, Error, ErrorKind, Result, TransportError};
pub use fetch::fetch;
pub use request::Request;
pub use response::Response;
pub use transport::Transport;
pub use validate::parse_url;

// Re-export url so callers don't need a direct dependency
pub use url::Url;
