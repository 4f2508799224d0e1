//! Configuration options for COIL encoding.
//!
//! Decoding needs no options: every document is self-describing.
//!
//! ## Examples
//!
//! ```rust
//! use coil_codec::EncodeOptions;
//!
//! // Defaults: intern values repeated at least twice, any length
//! let options = EncodeOptions::new();
//!
//! // Only intern long values repeated at least three times, and pin
//! // the alias for one field
//! let options = EncodeOptions::new()
//!     .with_value_min_freq(3)
//!     .with_min_len(4)
//!     .with_preferred_token("temperature", "T");
//! ```

use indexmap::IndexMap;

/// Configuration options for COIL encoding.
///
/// Built builder-style; every `with_*` method consumes and returns `self`.
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Minimum number of occurrences before a value is interned.
    pub value_min_freq: usize,
    /// Minimum character length before a value is interned.
    pub min_len: usize,
    /// Caller-supplied field → token overrides, consulted before the
    /// generated candidate chain (still collision-checked).
    pub preferred_map: IndexMap<String, String>,
    /// When false, value interning is disabled entirely.
    pub compact: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            value_min_freq: 2,
            min_len: 1,
            preferred_map: IndexMap::new(),
            compact: true,
        }
    }
}

impl EncodeOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil_codec::EncodeOptions;
    ///
    /// let options = EncodeOptions::new();
    /// assert_eq!(options.value_min_freq, 2);
    /// assert_eq!(options.min_len, 1);
    /// assert!(options.compact);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum occurrence count for value interning.
    #[must_use]
    pub fn with_value_min_freq(mut self, value_min_freq: usize) -> Self {
        self.value_min_freq = value_min_freq;
        self
    }

    /// Sets the minimum character length for value interning.
    #[must_use]
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Pins the preferred token for one field.
    ///
    /// The token is uppercased and still goes through the collision check;
    /// if it is unsafe it gains a numeric suffix like any other candidate.
    #[must_use]
    pub fn with_preferred_token(mut self, field: &str, token: &str) -> Self {
        self.preferred_map
            .insert(field.to_string(), token.to_string());
        self
    }

    /// Replaces the whole preferred-token map.
    #[must_use]
    pub fn with_preferred_map(mut self, preferred_map: IndexMap<String, String>) -> Self {
        self.preferred_map = preferred_map;
        self
    }

    /// Enables or disables value interning.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil_codec::EncodeOptions;
    ///
    /// let options = EncodeOptions::new().with_compact(false);
    /// assert!(!options.compact);
    /// ```
    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}
