//! User lookup demo
//!
//! Fetches a user record with both calling conventions of `FetchDecoder`.
//!
//! ```text
//! RUST_LOG=fetchkit=debug cargo run -p user-lookup-demo -- https://jsonplaceholder.typicode.com/users/1
//! ```

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use fetchkit::prelude::*;
use tokio::sync::oneshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_URL: &str = "https://jsonplaceholder.typicode.com/users/1";

// ============================================================================
// Data Types
// ============================================================================

/// The part of a user record we care about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
}

// ============================================================================
// Lookups
// ============================================================================

async fn lookup_direct(decoder: &FetchDecoder, url: &str) -> fetchkit::Result<User> {
    decoder.fetch(url).await
}

/// Returns `None` only if the callback task panicked before reporting.
async fn lookup_with_callback(
    decoder: &FetchDecoder,
    url: &str,
) -> Option<fetchkit::Result<User>> {
    let (tx, rx) = oneshot::channel();

    let handle = decoder.fetch_with(url, move |outcome: fetchkit::Result<User>| {
        if let Err(err) = &outcome {
            tracing::warn!(kind = %err.kind(), "callback received a failure");
        }
        let _ = tx.send(outcome);
    });

    if let Err(err) = handle.await {
        tracing::error!(error = %err, "callback task panicked");
    }

    rx.await.ok()
}

fn report(label: &str, outcome: &fetchkit::Result<User>) {
    match outcome {
        Ok(user) => println!(
            "[{label}] #{} {} <{}>",
            user.id,
            user.name,
            user.email.as_deref().unwrap_or("-")
        ),
        Err(err) => eprintln!("[{label}] {} ({err})", err.kind()),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fetchkit=info,user_lookup_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());
    tracing::info!(%url, "looking up user");

    let transport = HyperTransport::builder().with_logging().build();
    let decoder = FetchDecoder::with_transport(transport);

    let direct = lookup_direct(&decoder, &url).await;
    report("direct", &direct);

    match lookup_with_callback(&decoder, &url).await {
        Some(callback) => report("callback", &callback),
        None => eprintln!("[callback] no outcome delivered"),
    }
}

// ============================================================================
// Tests using wiremock
// ============================================================================
