//! Fetch a URL and decode its JSON body into a typed value.
//!
//! [`FetchDecoder`] validates a URL string, performs a single GET and decodes
//! the payload with serde. Failures are classified as one of four
//! [`Error`] variants: invalid URL, request failed, no data, decoding failed.
//!
//! # Example
//!
//! ```ignore
//! use fetchkit::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let decoder = FetchDecoder::new();
//! let user: User = decoder.fetch("https://example.com/user").await?;
//! ```
//!
//! The transport is pluggable: [`HyperTransport`] (hyper-util + rustls) is
//! the default, and any [`Transport`] implementation can be passed to
//! [`FetchDecoder::with_transport`].

mod client;
mod config;
mod connector;
mod fetcher;
pub mod middleware;
pub mod prelude;

// Re-export transport types
pub use client::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};
pub use config::{TransportConfig, TransportConfigBuilder};
pub use fetcher::FetchDecoder;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use fetchkit_core::{
    DecodeError, Error, ErrorKind, Request, Response, Result, Transport, TransportError, decode,
    parse_url,
};

pub use url;
