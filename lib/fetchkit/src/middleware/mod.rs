//! Tower middleware layers for the fetchkit transport.
//!
//! Layers wrap the type-erased transport service
//! ([`crate::BoxedService`]) and speak fetchkit's own [`crate::Request`] /
//! [`crate::Response`] / [`crate::TransportError`] types.
//!
//! - [`FollowRedirectLayer`] - Follows 3xx responses; always installed unless
//!   `max_redirects` is `0`
//! - [`LoggingLayer`] - Logs transfers using `tracing`
//!
//! # Example
//!
//! ```ignore
//! use fetchkit::HyperTransport;
//! use fetchkit::middleware::LoggingLayer;
//!
//! let transport = HyperTransport::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod follow_redirect;
mod logging;

pub use follow_redirect::{DEFAULT_MAX_REDIRECTS, FollowRedirect, FollowRedirectLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::Layer;
