//! Row serialization: the body line grammar and its checksum.
//!
//! ```text
//! body   := header RECORD_SEP row*
//! header := "sensordata" "[" rowcount "]" "{" shortkey ("," shortkey)* "}"
//! row    := pair (PAIR_SEP pair)*
//! pair   := shortkey ":" (value_token | escaped_value)
//! ```
//!
//! Column order is the sorted long-key order; pairs stay key-tagged so a
//! decoder survives missing fields. The checksum is CRC-32 (IEEE,
//! zlib-compatible) over the body payload bytes, rendered as 8 lowercase hex
//! digits.

use crate::escape::{escape, KV_SEP, PAIR_SEP, RECORD_SEP};
use crate::record::Record;
use crate::value::Scalar;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Header literal naming the table in the body and the decoded output.
pub(crate) const TABLE_TAG: &str = "sensordata";

/// CRC-32 of the body payload, as 8 lowercase hex digits.
pub(crate) fn checksum(payload: &str) -> String {
    format!("{:08x}", crc32fast::hash(payload.as_bytes()))
}

pub(crate) fn compose_header(rowcount: usize, shorts: &[&str]) -> String {
    format!("{TABLE_TAG}[{rowcount}]{{{}}}", shorts.join(","))
}

/// Parses the first body segment back into (rowcount, declared field order).
pub(crate) fn parse_header(segment: &str) -> Result<(usize, Vec<String>)> {
    let malformed = || Error::format(format!("unparsable body header {segment:?}"));
    let rest = segment
        .strip_prefix(TABLE_TAG)
        .and_then(|r| r.strip_prefix('['))
        .ok_or_else(malformed)?;
    let (count_text, rest) = rest.split_once(']').ok_or_else(malformed)?;
    let rowcount = count_text.parse::<usize>().map_err(|_| malformed())?;
    let fields_text = rest
        .strip_prefix('{')
        .and_then(|r| r.strip_suffix('}'))
        .ok_or_else(malformed)?;
    let shorts = if fields_text.is_empty() {
        Vec::new()
    } else {
        fields_text.split(PAIR_SEP).map(String::from).collect()
    };
    Ok((rowcount, shorts))
}

/// Renders the header and all rows into the body payload (no `BODY|` marker).
///
/// `columns` pairs each long field name with its short token, in column
/// order. A cell whose canonical text has an interned alias is replaced by
/// the token verbatim; everything else is escaped. Null and missing cells
/// render as the empty string.
pub(crate) fn render_body(
    records: &[Record],
    columns: &[(String, String)],
    value_aliases: &IndexMap<String, String>,
) -> String {
    let token_for: HashMap<&str, &str> = value_aliases
        .iter()
        .map(|(token, value)| (value.as_str(), token.as_str()))
        .collect();
    let shorts: Vec<&str> = columns.iter().map(|(_, short)| short.as_str()).collect();

    let pair_sep = PAIR_SEP.to_string();
    let record_sep = RECORD_SEP.to_string();

    let mut segments: Vec<String> = Vec::with_capacity(records.len() + 1);
    segments.push(compose_header(records.len(), &shorts));
    for record in records {
        let mut pairs = Vec::with_capacity(columns.len());
        for (field, short) in columns {
            let cell = record
                .get(field)
                .and_then(Scalar::canonical)
                .unwrap_or_default();
            let rendered = match token_for.get(cell.as_str()) {
                Some(token) => (*token).to_string(),
                None => escape(&cell),
            };
            pairs.push(format!("{short}{KV_SEP}{rendered}"));
        }
        segments.push(pairs.join(pair_sep.as_str()));
    }
    segments.join(record_sep.as_str())
}
