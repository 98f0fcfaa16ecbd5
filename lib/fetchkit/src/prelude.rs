//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy glob importing:
//!
//! ```ignore
//! use fetchkit::prelude::*;
//! ```

pub use crate::{
    Error, ErrorKind, FetchDecoder, HyperTransport, Result, Transport, TransportConfig,
    TransportError,
};
pub use serde::Deserialize;
