//! [`FetchDecoder`]: fetch a URL and decode its JSON payload.
//!
//! Two calling conventions share one implementation:
//! - [`FetchDecoder::fetch`] is awaited directly and returns the outcome
//! - [`FetchDecoder::fetch_with`] runs in a background task and hands the
//!   outcome to a one-shot callback

use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info_span, warn};

use crate::{Error, HyperTransport, Result, Transport, TransportError};

/// Fetches a URL and decodes the JSON payload into a caller-chosen type.
///
/// Invocations are independent: the decoder keeps no state between calls
/// besides its transport.
///
/// # Example
///
/// ```ignore
/// use fetchkit::FetchDecoder;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// let decoder = FetchDecoder::new();
///
/// // Direct
/// let user: User = decoder.fetch("https://example.com/user").await?;
///
/// // Callback
/// decoder.fetch_with("https://example.com/user", |outcome: fetchkit::Result<User>| {
///     match outcome {
///         Ok(user) => println!("{user:?}"),
///         Err(err) => eprintln!("{err}"),
///     }
/// });
/// ```
#[derive(Debug, Clone)]
pub struct FetchDecoder<C = HyperTransport> {
    transport: C,
}

impl FetchDecoder<HyperTransport> {
    /// Create a decoder over a default [`HyperTransport`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(HyperTransport::new())
    }
}

impl Default for FetchDecoder<HyperTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Transport> FetchDecoder<C> {
    /// Create a decoder over any [`Transport`].
    #[must_use]
    pub const fn with_transport(transport: C) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }

    /// Fetch `url` and decode the payload as `T`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidUrl`] if `url` is not a fetchable URL; nothing is sent
    /// - [`crate::Error::RequestFailed`] if the transport fails
    /// - [`crate::Error::NoData`] if the payload is empty
    /// - [`crate::Error::DecodingFailed`] if the payload does not decode as `T`
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let span = info_span!("fetch", %url, decode_as = std::any::type_name::<T>());

        async {
            let result = fetchkit_core::fetch(&self.transport, url).await;
            match &result {
                Ok(_) => debug!("fetch succeeded"),
                Err(err) => warn!(kind = %err.kind(), error = %err, "fetch failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

impl<C> FetchDecoder<C>
where
    C: Transport + Clone + 'static,
{
    /// Fetch `url` in a background task and pass the outcome to `callback`.
    ///
    /// `callback` is invoked exactly once, with the same outcome
    /// [`FetchDecoder::fetch`] would have produced. If the transport panics,
    /// the callback receives [`Error::RequestFailed`] with
    /// [`TransportError::Aborted`]. Dropping the returned handle does not
    /// cancel the task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn fetch_with<T, F>(&self, url: impl Into<String>, callback: F) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let decoder = self.clone();
        let url = url.into();

        tokio::spawn(async move {
            // The fetch runs in its own task so a panic cannot skip the callback
            let outcome = tokio::spawn(async move { decoder.fetch::<T>(&url).await })
                .await
                .unwrap_or_else(|err| {
                    error!(error = %err, "fetch task did not complete");
                    Err(Error::from(TransportError::aborted(err.to_string())))
                });
            callback(outcome);
        })
    }
}
