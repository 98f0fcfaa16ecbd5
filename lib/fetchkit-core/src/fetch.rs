//! The fetch-and-decode operation.
//!
//! ```text
//! Idle -> Validating -> InvalidUrl
//!                    -> Transferring -> RequestFailed | NoData
//!                                    -> Decoding -> DecodingFailed | Ok(T)
//! ```

use crate::{Error, Request, Result, Transport, decode, parse_url};

/// Validate `url`, GET it through `transport` and decode the payload as `T`.
///
/// The transfer is the only suspension point and happens at most once.
/// The status code is not inspected: whatever payload arrives is decoded.
///
/// # Errors
///
/// - [`Error::InvalidUrl`] if `url` is not a fetchable URL (no transfer happens)
/// - [`Error::RequestFailed`] if the transport fails
/// - [`Error::NoData`] if the payload is empty
/// - [`Error::DecodingFailed`] if the payload does not decode as `T`
///
/// # Example
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct User { id: u64, name: String }
///
/// let user: User = fetchkit_core::fetch(&transport, "https://example.com/user").await?;
/// ```
pub async fn fetch<T, C>(transport: &C, url: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
    C: Transport + ?Sized,
{
    let url = parse_url(url)?;
    let response = transport.execute(Request::get(url)).await?;

    let body = response.into_body();
    if body.is_empty() {
        return Err(Error::NoData);
    }

    decode(&body).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::Mutex;

    use assert2::{check, let_assert};
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{ErrorKind, Response, TransportError};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        id: u64,
        name: String,
    }

    /// Transport that records requested URLs and replies with a canned result.
    struct Recording {
        reply: std::result::Result<&'static str, TransportError>,
        calls: Mutex<Vec<String>>,
    }

    impl Recording {
        fn replying(body: &'static str) -> Self {
            Self {
                reply: Ok(body),
                calls: Mutex::default(),
            }
        }

        fn failing(err: TransportError) -> Self {
            Self {
                reply: Err(err),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl Transport for Recording {
        fn execute(
            &self,
            request: Request,
        ) -> impl Future<Output = std::result::Result<Response, TransportError>> + Send {
            self.calls
                .lock()
                .expect("lock")
                .push(request.url().to_string());
            let reply = self.reply.clone().map(Response::ok);
            async move { reply }
        }
    }

    #[tokio::test]
    async fn fetch_decodes_payload() {
        let transport = Recording::replying(r#"{"id": 1, "name": "Ada"}"#);

        let user: User = fetch(&transport, "https://example.com/user")
            .await
            .expect("fetch");

        check!(
            user == User {
                id: 1,
                name: "Ada".to_string()
            }
        );
        check!(transport.calls() == vec!["https://example.com/user".to_string()]);
    }

    #[tokio::test]
    async fn fetch_invalid_url_skips_transfer() {
        let transport = Recording::replying(r#"{"id": 1, "name": "Ada"}"#);

        let result: Result<User> = fetch(&transport, "not a url").await;

        let_assert!(Err(err) = result);
        check!(err.kind() == ErrorKind::InvalidUrl);
        check!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn fetch_wraps_transport_error() {
        let transport = Recording::failing(TransportError::connection("connection refused"));

        let result: Result<User> = fetch(&transport, "https://example.com/user").await;

        let_assert!(Err(Error::RequestFailed(inner)) = result);
        check!(inner == TransportError::connection("connection refused"));
        check!(transport.calls().len() == 1);
    }

    #[tokio::test]
    async fn fetch_empty_payload_is_no_data() {
        let transport = Recording::replying("");

        let result: Result<User> = fetch(&transport, "https://example.com/user").await;

        let_assert!(Err(err) = result);
        check!(err == Error::NoData);
    }

    #[tokio::test]
    async fn fetch_type_mismatch_is_decoding_failed() {
        #[derive(Debug, Deserialize)]
        struct Id {
            #[allow(dead_code)]
            id: i64,
        }

        let transport = Recording::replying(r#"{"id": "not-a-number"}"#);

        let result: Result<Id> = fetch(&transport, "https://example.com/user").await;

        let_assert!(Err(Error::DecodingFailed(inner)) = result);
        check!(inner.path() == "id");
    }

    #[tokio::test]
    async fn fetch_missing_field_is_decoding_failed() {
        let transport = Recording::replying(r#"{"id": 1}"#);

        let result: Result<User> = fetch(&transport, "https://example.com/user").await;

        let_assert!(Err(err) = result);
        check!(err.kind() == ErrorKind::DecodingFailed);
        check!(err.to_string().contains("name"));
    }
}
