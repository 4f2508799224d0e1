//! Collision-safe token allocation for field aliases.
//!
//! Tokens must satisfy the collision rule: a token may not appear as a
//! case-insensitive substring anywhere in the serialized original payload,
//! and no two identifiers may share one. The allocator holds the (lowercased)
//! payload text and the set of tokens it has handed out; both live only for
//! the duration of one encode call.
//!
//! Candidates for a field are an ordered pipeline of pure generators, tried
//! lazily: acronym of word segments (multi-word names only), first letter,
//! first two letters, first three letters, and the full name uppercased.
//! When every candidate is taken or unsafe, a numeric suffix is appended to
//! the first viable base until a free token is found, bounded by a retry
//! budget.

use crate::error::Error;
use crate::Result;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Bounded retry budget for the numeric-suffix fallback.
const MAX_SUFFIX_ATTEMPTS: usize = 10_000;

/// Per-call token allocation state: payload text plus the used-token set.
pub(crate) struct TokenAllocator<'a> {
    payload: &'a str,
    used: HashSet<String>,
}

impl<'a> TokenAllocator<'a> {
    /// `payload` must be the lowercased serialization of the whole input
    /// document, so that the substring check is case-insensitive.
    pub(crate) fn new(payload: &'a str) -> Self {
        TokenAllocator {
            payload,
            used: HashSet::new(),
        }
    }

    fn is_free(&self, token: &str) -> bool {
        !self.used.contains(token) && !self.payload.contains(&token.to_lowercase())
    }

    /// Picks the first free candidate, falling back to `base+N`.
    ///
    /// Candidates are sanitized to alphanumerics; empty results are skipped.
    /// The suffix base is the first non-empty sanitized candidate, or
    /// `fallback_base` when the pipeline produced nothing at all.
    pub(crate) fn allocate<I>(&mut self, candidates: I, fallback_base: &str) -> Result<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut base: Option<String> = None;
        for candidate in candidates {
            let token = sanitize(&candidate);
            if token.is_empty() {
                continue;
            }
            if base.is_none() {
                base = Some(token.clone());
            }
            if self.is_free(&token) {
                self.used.insert(token.clone());
                return Ok(token);
            }
        }
        let base = base.unwrap_or_else(|| fallback_base.to_string());
        for n in 1..=MAX_SUFFIX_ATTEMPTS {
            let token = format!("{base}{n}");
            if self.is_free(&token) {
                self.used.insert(token.clone());
                return Ok(token);
            }
        }
        Err(Error::token_space_exhausted(&base, MAX_SUFFIX_ATTEMPTS))
    }
}

fn sanitize(candidate: &str) -> String {
    candidate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Runs of ASCII letters in `text`.
pub(crate) fn alpha_words(text: &str) -> Vec<&str> {
    split_runs(text, |c| c.is_ascii_alphabetic())
}

/// Runs of ASCII letters and digits in `text`.
pub(crate) fn alnum_words(text: &str) -> Vec<&str> {
    split_runs(text, |c| c.is_ascii_alphanumeric())
}

fn split_runs(text: &str, keep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        if keep(ch) {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            words.push(&text[s..i]);
        }
    }
    if let Some(s) = start {
        words.push(&text[s..]);
    }
    words
}

fn acronym(name: &str) -> Option<String> {
    let words = alpha_words(name);
    if words.len() > 1 {
        Some(
            words
                .iter()
                .filter_map(|w| w.chars().next())
                .collect::<String>()
                .to_uppercase(),
        )
    } else {
        None
    }
}

fn first_letters(name: &str, count: usize) -> Option<String> {
    let words = alpha_words(name);
    let source = words.first().copied().unwrap_or(name);
    let prefix: String = source.chars().take(count).collect();
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_uppercase())
    }
}

fn first_letter(name: &str) -> Option<String> {
    first_letters(name, 1)
}

fn first_two(name: &str) -> Option<String> {
    first_letters(name, 2)
}

fn first_three(name: &str) -> Option<String> {
    first_letters(name, 3)
}

fn full_upper(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_uppercase())
    }
}

const FIELD_GENERATORS: [fn(&str) -> Option<String>; 5] =
    [acronym, first_letter, first_two, first_three, full_upper];

/// Ordered candidate pipeline for one field name, evaluated lazily.
pub(crate) fn field_candidates(name: &str) -> impl Iterator<Item = String> + '_ {
    FIELD_GENERATORS.iter().filter_map(move |gen| gen(name))
}

/// Builds the bijective long-name → short-token table for `fields`.
///
/// `fields` must already be in sorted order; tokens come out uppercase. A
/// `preferred` entry replaces the generated candidate chain for that field
/// but still passes through the collision check and suffix fallback.
pub(crate) fn build_field_aliases(
    fields: &[String],
    payload: &str,
    preferred: &IndexMap<String, String>,
) -> Result<IndexMap<String, String>> {
    let mut allocator = TokenAllocator::new(payload);
    let mut aliases = IndexMap::with_capacity(fields.len());
    for field in fields {
        let token = match preferred.get(field) {
            Some(choice) => {
                allocator.allocate(std::iter::once(choice.to_uppercase()), "T")?
            }
            None => allocator.allocate(field_candidates(field), "T")?,
        };
        aliases.insert(field.clone(), token);
    }
    Ok(aliases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_candidates_multiword() {
        let candidates: Vec<_> = field_candidates("battery_level").collect();
        assert_eq!(candidates[0], "BL"); // acronym comes first
        assert_eq!(candidates[1], "B");
        assert_eq!(candidates[2], "BA");
        assert_eq!(candidates[3], "BAT");
    }

    #[test]
    fn test_field_candidates_single_word() {
        let candidates: Vec<_> = field_candidates("temperature").collect();
        assert_eq!(candidates, vec!["T", "TE", "TEM", "TEMPERATURE"]);
    }

    #[test]
    fn test_allocator_prefers_earliest_free_candidate() {
        // payload contains neither "t" nor "te"
        let mut allocator = TokenAllocator::new("xyz");
        let token = allocator
            .allocate(field_candidates("temperature"), "T")
            .unwrap();
        assert_eq!(token, "T");
    }

    #[test]
    fn test_allocator_skips_payload_substrings() {
        // "t" and "te" occur in the payload, "tem" does not
        let mut allocator = TokenAllocator::new("a test payload");
        let token = allocator
            .allocate(field_candidates("temperature"), "T")
            .unwrap();
        assert_eq!(token, "TEM");
    }

    #[test]
    fn test_allocator_suffix_fallback() {
        // every generated candidate is a substring of the payload
        let mut allocator = TokenAllocator::new("temperature");
        let token = allocator
            .allocate(field_candidates("temperature"), "T")
            .unwrap();
        assert_eq!(token, "T1");
    }

    #[test]
    fn test_aliases_are_bijective() {
        let fields: Vec<String> = ["temp", "ts", "topic"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let aliases =
            build_field_aliases(&fields, "temp ts topic", &IndexMap::new()).unwrap();
        let tokens: std::collections::HashSet<_> = aliases.values().collect();
        assert_eq!(tokens.len(), fields.len());
    }

    #[test]
    fn test_preferred_token_wins_when_free() {
        let mut preferred = IndexMap::new();
        preferred.insert("temperature".to_string(), "Q".to_string());
        let fields = vec!["temperature".to_string()];
        let aliases = build_field_aliases(&fields, "temperature", &preferred).unwrap();
        assert_eq!(aliases["temperature"], "Q");
    }

    #[test]
    fn test_preferred_token_still_collision_checked() {
        let mut preferred = IndexMap::new();
        preferred.insert("temperature".to_string(), "Q".to_string());
        let fields = vec!["temperature".to_string()];
        // payload contains "q", so the preferred token falls back to Q1
        let aliases = build_field_aliases(&fields, "quota temperature", &preferred).unwrap();
        assert_eq!(aliases["temperature"], "Q1");
    }
}
