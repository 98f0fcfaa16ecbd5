//! JSON decoding step.

use crate::DecodeError;

/// Deserialize JSON bytes into `T` with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the exact field that failed
/// (e.g. `user.address.city`). Failures at the document root, syntax errors
/// included, carry an empty path.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the bytes are not valid JSON or do not match
/// the shape of `T`.
///
/// # Example
///
/// ```
/// use fetchkit_core::decode;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { id: u64, name: String }
///
/// let user: User = decode(br#"{"id":1,"name":"Ada"}"#).expect("decode");
/// assert_eq!(user, User { id: 1, name: "Ada".to_string() });
/// ```
pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| DecodeError::new(e.path().to_string(), e.inner().to_string()))?;

    // Reject trailing garbage after the value
    deserializer
        .end()
        .map_err(|e| DecodeError::new(String::new(), e.to_string()))?;

    Ok(value)
}
