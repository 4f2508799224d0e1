//! Value interning: short aliases for values repeated across rows.
//!
//! Runs once per encode call, after the full value population is known.
//! Values are ranked by (descending frequency, descending length) so the
//! most valuable abbreviations claim the shortest tokens first; ties keep
//! first-occurrence order for determinism. Candidates are lowercase to keep
//! the value namespace visually distinct from the uppercase field aliases —
//! decode resolves through the explicit map either way.

use crate::token::{alnum_words, TokenAllocator};
use crate::Result;
use indexmap::IndexMap;

fn acronym(value: &str) -> Option<String> {
    let words = alnum_words(value);
    if words.len() > 1 {
        Some(
            words
                .iter()
                .filter_map(|w| w.chars().next())
                .collect::<String>()
                .to_lowercase(),
        )
    } else {
        None
    }
}

fn consonants(value: &str, count: usize) -> Option<String> {
    let compact: String = alnum_words(value)
        .concat()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        .collect();
    if compact.is_empty() {
        None
    } else {
        Some(compact.chars().take(count).collect())
    }
}

fn consonants_three(value: &str) -> Option<String> {
    consonants(value, 3)
}

fn consonants_four(value: &str) -> Option<String> {
    consonants(value, 4)
}

fn first_letters(value: &str, count: usize) -> Option<String> {
    let words = alnum_words(value);
    words
        .first()
        .map(|w| w.chars().take(count).collect::<String>().to_lowercase())
}

fn first_three(value: &str) -> Option<String> {
    first_letters(value, 3)
}

fn first_two(value: &str) -> Option<String> {
    first_letters(value, 2)
}

fn digits_or_prefix(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        Some(value.chars().take(3).collect::<String>().to_lowercase())
    } else {
        Some(digits)
    }
}

const VALUE_GENERATORS: [fn(&str) -> Option<String>; 6] = [
    acronym,
    consonants_three,
    consonants_four,
    first_three,
    first_two,
    digits_or_prefix,
];

/// Ordered candidate pipeline for one value, evaluated lazily.
pub(crate) fn value_candidates(value: &str) -> impl Iterator<Item = String> + '_ {
    VALUE_GENERATORS.iter().filter_map(move |gen| gen(value))
}

/// Builds the short-token → value table for values meeting both thresholds.
///
/// Values containing `&` or `;` can never travel in the meta grammar and
/// stay escaped literals in the body instead.
pub(crate) fn build_value_aliases(
    values: &[String],
    payload: &str,
    value_min_freq: usize,
    min_len: usize,
) -> Result<IndexMap<String, String>> {
    let mut census: IndexMap<&str, usize> = IndexMap::new();
    for value in values {
        *census.entry(value.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = census.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.0.chars().count().cmp(&a.0.chars().count()))
    });

    let mut allocator = TokenAllocator::new(payload);
    let mut aliases = IndexMap::new();
    for (value, freq) in ranked {
        if freq < value_min_freq || value.chars().count() < min_len {
            continue;
        }
        if value.contains('&') || value.contains(';') {
            continue;
        }
        let token = allocator.allocate(value_candidates(value), "x")?;
        aliases.insert(token, value.to_string());
    }
    Ok(aliases)
}
