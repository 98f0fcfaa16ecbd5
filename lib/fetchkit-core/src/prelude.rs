//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use fetchkit_core::prelude::*;
//! ```

pub use crate::{
    DecodeError, Error, ErrorKind, Request, Response, Result, Transport, TransportError, decode,
    fetch, parse_url,
};
