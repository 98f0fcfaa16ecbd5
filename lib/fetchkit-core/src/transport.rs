//! Transport capability.
//!
//! [`Transport`] is the seam between the fetch operation and the network.
//! `fetchkit` ships a hyper-based implementation; tests use in-memory ones.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, TransportError};

/// Performs a single transfer for a validated request.
///
/// Implementations must make exactly one attempt per call: no retries.
/// What happens inside (connection reuse, redirects, TLS) is up to the
/// implementation.
///
/// # Example
///
/// ```
/// use std::future::Future;
///
/// use fetchkit_core::{Request, Response, Transport, TransportError};
///
/// struct Fixed(&'static str);
///
/// impl Transport for Fixed {
///     fn execute(
///         &self,
///         _request: Request,
///     ) -> impl Future<Output = Result<Response, TransportError>> + Send {
///         let body = self.0;
///         async move { Ok(Response::ok(body)) }
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Execute the request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails for any transport-level reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Redirect failures
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        (**self).execute(request)
    }
}
