//! Error types for COIL encoding and decoding.
//!
//! Every failure is terminal for the call that produced it: there is no
//! row-level recovery, and a document that fails to decode yields no partial
//! record list. Callers that transport COIL documents opportunistically are
//! expected to fall back to raw JSON when `encode` or `decode` returns an
//! error.
//!
//! ## Error Categories
//!
//! - **Structural**: the input document does not have the shape the
//!   requested direction expects (wrong `data` subtree, non-object records)
//! - **Format**: missing `META&`/`BODY|` markers, unparsable header,
//!   malformed row pairs, missing mandatory meta entries
//! - **ChecksumMismatch**: the body payload was altered in transit
//! - **TokenSpaceExhausted**: collision avoidance ran out of retry budget
//!
//! ## Examples
//!
//! ```rust
//! use coil_codec::{decode, Error};
//! use serde_json::json;
//!
//! let result = decode(&json!({"data": {"meta": "bogus", "body": "bogus"}}));
//! assert!(matches!(result, Err(Error::Format(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during COIL encoding/decoding.
///
/// Each variant carries enough context (offending fragment, expected and
/// computed checksum, exhausted token base) to be logged as-is.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Input document shape does not match what encode/decode expects
    #[error("structural error: {0}")]
    Structural(String),

    /// Missing markers, unparsable header, or malformed meta/body grammar
    #[error("format error: {0}")]
    Format(String),

    /// Recomputed body checksum differs from the one stored in meta
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Collision-safe token search hit its retry budget
    #[error("token space exhausted for base {base:?} after {attempts} attempts")]
    TokenSpaceExhausted { base: String, attempts: usize },

    /// JSON parse or serialize failure in the string-level API
    #[error("JSON error: {0}")]
    Json(String),
}

impl Error {
    /// Creates a structural error for an input that does not match the
    /// expected document shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil_codec::Error;
    ///
    /// let err = Error::structural("'data' must be a list of records");
    /// assert!(err.to_string().contains("structural error"));
    /// ```
    pub fn structural<T: fmt::Display>(msg: T) -> Self {
        Error::Structural(msg.to_string())
    }

    /// Creates a format error for malformed COIL text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil_codec::Error;
    ///
    /// let err = Error::format("META missing map entry");
    /// assert!(err.to_string().contains("META missing map entry"));
    /// ```
    pub fn format<T: fmt::Display>(msg: T) -> Self {
        Error::Format(msg.to_string())
    }

    /// Creates a checksum mismatch error carrying both digests.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil_codec::Error;
    ///
    /// let err = Error::checksum_mismatch("00000000", "deadbeef");
    /// assert!(err.to_string().contains("expected 00000000"));
    /// ```
    pub fn checksum_mismatch(expected: &str, actual: &str) -> Self {
        Error::ChecksumMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates a token-space-exhausted error for a base that never became free.
    pub fn token_space_exhausted(base: &str, attempts: usize) -> Self {
        Error::TokenSpaceExhausted {
            base: base.to_string(),
            attempts,
        }
    }

    /// Creates a JSON error from any displayable parse/serialize failure.
    pub fn json<T: fmt::Display>(msg: T) -> Self {
        Error::Json(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
