//! URL validation step.

use url::Url;

use crate::{Error, Result};

const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// Parse a caller-supplied string into a fetchable URL.
///
/// Accepts absolute `http`/`https` URLs with a host. Pure and synchronous:
/// nothing is sent.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] for empty input, malformed syntax, relative
/// references, unsupported schemes, or a missing host.
///
/// # Example
///
/// ```
/// use fetchkit_core::parse_url;
///
/// assert!(parse_url("https://example.com/user").is_ok());
/// assert!(parse_url("not a url").is_err());
/// assert!(parse_url("ftp://example.com/file").is_err());
/// ```
pub fn parse_url(input: &str) -> Result<Url> {
    if input.trim().is_empty() {
        return Err(Error::invalid_url("empty URL"));
    }

    let url = Url::parse(input).map_err(|e| Error::invalid_url(e.to_string()))?;

    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(Error::invalid_url(format!(
            "unsupported scheme `{}`",
            url.scheme()
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_url("missing host"));
    }

    Ok(url)
}
