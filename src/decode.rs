//! Decoder: META_PARSED → CHECKSUM_VERIFIED → BODY_PARSED → DONE.
//!
//! A linear pipeline of fallible steps; any failure is terminal for the
//! whole call (no row-level recovery). Everything the decoder needs comes
//! from the document's own meta string — there is no shared state between
//! calls and no configuration surface.

use crate::escape::{split_once_unescaped, split_unescaped, unescape, KV_SEP, PAIR_SEP, RECORD_SEP};
use crate::meta::{Meta, BODY_PREFIX, META_PREFIX};
use crate::record::Record;
use crate::row::{checksum, parse_header, TABLE_TAG};
use crate::{Error, Result};
use serde_json::Value;
use tracing::debug;

pub(crate) fn decode_document(doc: &Value) -> Result<Value> {
    // START -> META_PARSED
    let root = doc
        .as_object()
        .ok_or_else(|| Error::structural("document must be a JSON object"))?;
    let data = root.get("data").and_then(Value::as_object).ok_or_else(|| {
        Error::structural("input does not contain a COIL 'data' object with 'meta' and 'body'")
    })?;
    if data.len() != 2 {
        return Err(Error::structural(
            "'data' must contain exactly 'meta' and 'body'",
        ));
    }
    let meta_text = data
        .get("meta")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::structural("'data.meta' must be a string"))?;
    let body_text = data
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::structural("'data.body' must be a string"))?;

    let (Some(meta_entries), Some(body_payload)) = (
        meta_text.strip_prefix(META_PREFIX),
        body_text.strip_prefix(BODY_PREFIX),
    ) else {
        return Err(Error::format("not valid COIL META/BODY format"));
    };
    let meta = Meta::parse(meta_entries)?;

    // META_PARSED -> CHECKSUM_VERIFIED
    let actual = checksum(body_payload);
    if actual != meta.checksum {
        return Err(Error::checksum_mismatch(&meta.checksum, &actual));
    }

    // CHECKSUM_VERIFIED -> BODY_PARSED
    let mut segments = split_unescaped(body_payload, RECORD_SEP).into_iter();
    let header = segments.next().unwrap_or_default();
    let (declared_rows, _field_order) = parse_header(header)?;

    let mut records = Vec::new();
    for segment in segments {
        if segment.trim().is_empty() {
            continue;
        }
        records.push(parse_row(segment, &meta)?);
    }
    debug!(
        rows = records.len(),
        declared = declared_rows,
        checksum = %actual,
        "decoded COIL body"
    );

    // BODY_PARSED -> DONE
    let table: Vec<Value> = records.iter().map(Record::to_json).collect();
    let mut data_obj = serde_json::Map::with_capacity(1);
    data_obj.insert(TABLE_TAG.to_string(), Value::Array(table));

    let mut out = root.clone();
    out.insert("data".to_string(), Value::Object(data_obj));
    for (key, raw) in &meta.passthrough {
        if !out.contains_key(key) {
            // JSON first; the raw-text fallback accepts unquoted values
            // written by older encoders
            let value = serde_json::from_str(raw)
                .unwrap_or_else(|_| Value::String(raw.clone()));
            out.insert(key.clone(), value);
        }
    }
    Ok(Value::Object(out))
}

/// One row: comma-separated pairs, each `shortkey:value`.
///
/// An unknown short key passes through literally; a pair without `:` aborts
/// the decode.
fn parse_row(segment: &str, meta: &Meta) -> Result<Record> {
    let mut record = Record::with_capacity(meta.fields.len());
    for pair in split_unescaped(segment, PAIR_SEP) {
        let (short, raw) = split_once_unescaped(pair, KV_SEP)
            .ok_or_else(|| Error::format(format!("malformed row pair {pair:?}")))?;
        let text = match meta.values.get(raw) {
            Some(value) => value.clone(),
            None => unescape(raw),
        };
        let ty = meta.types.get(short).copied().unwrap_or_default();
        let field = meta
            .fields
            .get(short)
            .cloned()
            .unwrap_or_else(|| short.to_string());
        record.insert(field, ty.restore(text));
    }
    Ok(record)
}
