//! Reversible escaping of the COIL structural delimiters.
//!
//! Values that are not replaced by an interned token travel through the body
//! verbatim, so the record separator `|`, the pair separator `,`, the
//! key/value separator `:`, and the escape character itself must be prefixed
//! with `\` wherever they occur literally. `unescape` treats any
//! escape-prefixed character as literal, consuming both; no other character
//! is altered.

/// Escape character prefixing literal delimiters.
pub const ESCAPE_CHAR: char = '\\';
/// Separates pairs within a row.
pub const PAIR_SEP: char = ',';
/// Separates the header and rows within the body payload.
pub const RECORD_SEP: char = '|';
/// Separates a short key from its value within a pair.
pub const KV_SEP: char = ':';

/// Escapes a raw value for embedding in the body.
///
/// Single left-to-right pass; `unescape(escape(s)) == s` for every `s`.
///
/// # Examples
///
/// ```rust
/// use coil_codec::escape::escape;
///
/// assert_eq!(escape("a|b"), "a\\|b");
/// assert_eq!(escape("x:y,z"), "x\\:y\\,z");
/// assert_eq!(escape("plain"), "plain");
/// ```
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, ESCAPE_CHAR | KV_SEP | RECORD_SEP | PAIR_SEP) {
            out.push(ESCAPE_CHAR);
        }
        out.push(ch);
    }
    out
}

/// Reverses [`escape`], restoring the raw value.
///
/// A trailing escape character with nothing after it is kept verbatim.
///
/// # Examples
///
/// ```rust
/// use coil_codec::escape::unescape;
///
/// assert_eq!(unescape("a\\|b"), "a|b");
/// assert_eq!(unescape("x\\:y\\,z"), "x:y,z");
/// ```
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE_CHAR {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Splits `text` on every occurrence of `sep` that is not escape-prefixed.
///
/// The returned segments are still in escaped form. Splitting the body this
/// way is what lets literal delimiters inside values survive the trip.
///
/// # Examples
///
/// ```rust
/// use coil_codec::escape::split_unescaped;
///
/// assert_eq!(split_unescaped("a|b", '|'), vec!["a", "b"]);
/// assert_eq!(split_unescaped("a\\|b|c", '|'), vec!["a\\|b", "c"]);
/// ```
#[must_use]
pub fn split_unescaped(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut escaped = false;
    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE_CHAR {
            escaped = true;
        } else if ch == sep {
            parts.push(&text[start..i]);
            start = i + ch.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Splits `text` at the first occurrence of `sep` that is not
/// escape-prefixed, or returns `None` if there is no such occurrence.
#[must_use]
pub fn split_once_unescaped(text: &str, sep: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE_CHAR {
            escaped = true;
        } else if ch == sep {
            return Some((&text[..i], &text[i + ch.len_utf8()..]));
        }
    }
    None
}
