//! The self-describing meta string: composer and parser.
//!
//! Grammar: `"META&" entry ("&" entry)*`, with entries split on the first
//! `=`. `checksum` and `map` are mandatory; `vmap` and `types` are optional;
//! every other well-formed entry is a passthrough carrying one top-level
//! document key. Entries without `=` are ignored, which keeps the parser
//! tolerant of foreign extensions.

use crate::value::ColumnType;
use crate::{Error, Result};
use indexmap::IndexMap;

pub(crate) const META_PREFIX: &str = "META&";
pub(crate) const BODY_PREFIX: &str = "BODY|";

/// Parsed view of one document's meta string. Built fresh per decode call.
#[derive(Debug, Clone, Default)]
pub(crate) struct Meta {
    pub checksum: String,
    /// short key → long field name
    pub fields: IndexMap<String, String>,
    /// short token → long value
    pub values: IndexMap<String, String>,
    /// short key → column type tag
    pub types: IndexMap<String, ColumnType>,
    /// top-level keys captured at encode time, raw text values
    pub passthrough: Vec<(String, String)>,
}

impl Meta {
    /// Parses the text after the `META&` marker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] when the mandatory `map` or `checksum`
    /// entry is missing.
    pub(crate) fn parse(entries_text: &str) -> Result<Self> {
        let mut meta = Meta::default();
        let mut saw_map = false;
        for part in entries_text.split('&') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            match key {
                "checksum" => meta.checksum = value.to_string(),
                "map" => {
                    saw_map = true;
                    meta.fields = parse_pairs(value);
                }
                "vmap" => meta.values = parse_pairs(value),
                "types" => {
                    meta.types = parse_pairs(value)
                        .into_iter()
                        .map(|(short, tag)| (short, ColumnType::from_tag(&tag)))
                        .collect();
                }
                _ => meta
                    .passthrough
                    .push((key.to_string(), value.to_string())),
            }
        }
        if !saw_map {
            return Err(Error::format("META missing map entry"));
        }
        if meta.checksum.is_empty() {
            return Err(Error::format("META missing checksum entry"));
        }
        Ok(meta)
    }
}

fn parse_pairs(text: &str) -> IndexMap<String, String> {
    text.split(';')
        .filter_map(|entry| entry.split_once(':'))
        .map(|(short, long)| (short.to_string(), long.to_string()))
        .collect()
}

/// Composes the meta string, including the `META&` marker.
///
/// Entry order: `checksum`, `map` (by long key, i.e. the order of
/// `columns`), `vmap` when non-empty, `types` for non-string columns,
/// passthrough entries in document order.
pub(crate) fn compose(
    checksum: &str,
    columns: &[(String, String)],
    value_aliases: &IndexMap<String, String>,
    column_types: &[(String, ColumnType)],
    passthrough: &[(String, String)],
) -> String {
    let mut parts = vec![format!("checksum={checksum}")];

    let map_entries: Vec<String> = columns
        .iter()
        .map(|(field, short)| format!("{short}:{field}"))
        .collect();
    parts.push(format!("map={}", map_entries.join(";")));

    if !value_aliases.is_empty() {
        let vmap_entries: Vec<String> = value_aliases
            .iter()
            .map(|(token, value)| format!("{token}:{value}"))
            .collect();
        parts.push(format!("vmap={}", vmap_entries.join(";")));
    }

    let type_entries: Vec<String> = column_types
        .iter()
        .filter(|(_, ty)| *ty != ColumnType::Str)
        .map(|(short, ty)| format!("{short}:{}", ty.as_str()))
        .collect();
    if !type_entries.is_empty() {
        parts.push(format!("types={}", type_entries.join(";")));
    }

    for (key, value) in passthrough {
        parts.push(format!("{key}={value}"));
    }

    format!("{META_PREFIX}{}", parts.join("&"))
}
