//! Integration tests for transport middleware: redirects, logging, custom layers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use assert2::{check, let_assert};
use fetchkit::middleware::LoggingLayer;
use fetchkit::tower::{Layer, Service};
use fetchkit::{
    Error, FetchDecoder, HyperTransport, Request, Response, Result, ServiceFuture, TransportError,
};
use serde::Deserialize;
use tokio::sync::oneshot;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[derive(Debug, PartialEq, Deserialize)]
struct Moved {
    moved: bool,
}

/// Test that relative redirects are followed by default.
#[tokio::test]
async fn test_follows_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"moved": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let decoder = FetchDecoder::new();
    let moved: Moved = decoder
        .fetch(&format!("{}/old", mock_server.uri()))
        .await
        .expect("redirect followed");

    check!(moved == Moved { moved: true });
}

/// Test that a redirect loop ends with `TooManyRedirects`.
#[tokio::test]
async fn test_redirect_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::builder().max_redirects(2).build();
    let decoder = FetchDecoder::with_transport(transport);

    let result: Result<Moved> = decoder.fetch(&format!("{}/loop", mock_server.uri())).await;

    let_assert!(Err(err) = result);
    insta::assert_snapshot!(
        err.to_string(),
        @"request failed: too many redirects (2 exceeded max of 2)"
    );
    let_assert!(Error::RequestFailed(inner) = err);
    check!(inner == TransportError::TooManyRedirects { count: 2, max: 2 });
}

/// Test that redirects are left alone when following is disabled.
#[tokio::test]
async fn test_redirects_disabled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::builder().max_redirects(0).build();
    let decoder = FetchDecoder::with_transport(transport);

    // The 302 carries no body
    let result: Result<Moved> = decoder.fetch(&format!("{}/old", mock_server.uri())).await;

    check!(result == Err(Error::NoData));
}

/// Test that logging middleware doesn't change outcomes.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"moved": false})))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::builder()
        .with_logging()
        .with_debug_logging()
        .build();
    let decoder = FetchDecoder::with_transport(transport);

    let moved: Moved = decoder
        .fetch(&format!("{}/logged", mock_server.uri()))
        .await
        .expect("logged");
    check!(!moved.moved);

    let result: Result<Moved> = decoder.fetch("http://127.0.0.1:1/logged").await;
    let_assert!(Err(Error::RequestFailed(_)) = result);
}

/// Test that default middleware can be enabled.
#[tokio::test]
async fn test_with_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"moved": true})))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::builder()
        .with_defaults()
        .layer(LoggingLayer::debug())
        .build();

    let moved: Moved = FetchDecoder::with_transport(transport)
        .fetch(&mock_server.uri())
        .await
        .expect("defaults");
    check!(moved.moved);
}

// ============================================================================
// Custom layer
// ============================================================================

/// Counts transfers passing through it.
#[derive(Clone)]
struct CountingLayer {
    count: Arc<AtomicUsize>,
}

impl<S> Layer<S> for CountingLayer {
    type Service = Counting<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Counting {
            inner,
            count: Arc::clone(&self.count),
        }
    }
}

#[derive(Clone)]
struct Counting<S> {
    inner: S,
    count: Arc<AtomicUsize>,
}

impl<S> Service<Request> for Counting<S>
where
    S: Service<Request, Response = Response, Error = TransportError, Future = ServiceFuture>,
{
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), TransportError>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.call(request)
    }
}

/// Test that custom layers see one transfer per fetch, redirects included.
#[tokio::test]
async fn test_custom_layer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(307).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"moved": true})))
        .mount(&mock_server)
        .await;

    let count = Arc::new(AtomicUsize::new(0));
    let transport = HyperTransport::builder()
        .layer(CountingLayer {
            count: Arc::clone(&count),
        })
        .build();
    let decoder = FetchDecoder::with_transport(transport);

    let _: Moved = decoder
        .fetch(&format!("{}/old", mock_server.uri()))
        .await
        .expect("moved");
    let invalid: Result<Moved> = decoder.fetch("not a url").await;

    check!(invalid.is_err());
    check!(count.load(Ordering::SeqCst) == 1);
}

// ============================================================================
// Readiness
// ============================================================================

/// Rejects calls that were not preceded by a successful `poll_ready`.
#[derive(Clone, Copy)]
struct ReadyGuardLayer;

impl<S> Layer<S> for ReadyGuardLayer {
    type Service = ReadyGuard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ReadyGuard {
            inner,
            ready: false,
        }
    }
}

struct ReadyGuard<S> {
    inner: S,
    ready: bool,
}

// A clone starts out unready
impl<S: Clone> Clone for ReadyGuard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            ready: false,
        }
    }
}

impl<S> Service<Request> for ReadyGuard<S>
where
    S: Service<Request, Response = Response, Error = TransportError, Future = ServiceFuture>,
{
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), TransportError>> {
        let poll = self.inner.poll_ready(cx);
        if matches!(poll, Poll::Ready(Ok(()))) {
            self.ready = true;
        }
        poll
    }

    fn call(&mut self, request: Request) -> Self::Future {
        if !std::mem::take(&mut self.ready) {
            return Box::pin(async {
                Err(TransportError::invalid_request("called before poll_ready"))
            });
        }
        self.inner.call(request)
    }
}

/// Test that every layer is readied before it is called, in both conventions.
#[tokio::test]
async fn test_layers_are_readied_before_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"moved": true})))
        .mount(&mock_server)
        .await;

    // Guards inside and outside the logging layer
    let transport = HyperTransport::builder()
        .layer(ReadyGuardLayer)
        .with_logging()
        .layer(ReadyGuardLayer)
        .build();
    let decoder = FetchDecoder::with_transport(transport);
    let url = format!("{}/old", mock_server.uri());

    let moved: Moved = decoder.fetch(&url).await.expect("direct");
    check!(moved.moved);

    let (tx, rx) = oneshot::channel();
    let _handle = decoder.fetch_with(url, move |outcome: Result<Moved>| {
        let _ = tx.send(outcome);
    });

    let_assert!(Ok(Ok(moved)) = rx.await);
    check!(moved == Moved { moved: true });
}
