//! Transfer request.
//!
//! A [`Request`] only exists for a URL that passed [`crate::parse_url`]; the
//! method is always GET.
//!
//! # Example
//!
//! ```
//! use fetchkit_core::{Request, parse_url};
//!
//! let url = parse_url("https://api.example.com/users/1").expect("valid URL");
//! let request = Request::get(url);
//! assert_eq!(request.method(), "GET");
//! ```

use url::Url;

/// A GET request for a validated URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: Url,
}

impl Request {
    /// Creates a GET request.
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self { url }
    }

    /// HTTP method, always `GET`.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        "GET"
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Consume into the URL.
    #[must_use]
    pub fn into_url(self) -> Url {
        self.url
    }
}
