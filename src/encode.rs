//! Encode orchestration: table extraction, alias construction, assembly.
//!
//! One call owns all of its state — payload text, allocator, interner,
//! alias tables — so concurrent callers never coordinate.

use crate::intern::build_value_aliases;
use crate::meta;
use crate::options::EncodeOptions;
use crate::record::Record;
use crate::row::{checksum, render_body};
use crate::token::build_field_aliases;
use crate::value::{json_kind, ColumnType};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Meta entry names that a passthrough key must not shadow.
const RESERVED_META_KEYS: [&str; 4] = ["checksum", "map", "vmap", "types"];

pub(crate) fn encode_document(doc: &Value, options: &EncodeOptions) -> Result<Value> {
    let root = doc
        .as_object()
        .ok_or_else(|| Error::structural("document must be a JSON object"))?;
    let Some(data) = root.get("data") else {
        // nothing to compact; hand the document back untouched
        return Ok(doc.clone());
    };

    let records = extract_table(data)?;
    let fields = field_census(&records)?;

    let payload_text = serde_json::to_string(doc)
        .map_err(Error::json)?
        .to_lowercase();

    let field_aliases = build_field_aliases(&fields, &payload_text, &options.preferred_map)?;
    let columns: Vec<(String, String)> = field_aliases
        .iter()
        .map(|(field, short)| (field.clone(), short.clone()))
        .collect();

    let value_aliases = if options.compact {
        let values: Vec<String> = records
            .iter()
            .flat_map(|record| record.iter().filter_map(|(_, cell)| cell.canonical()))
            .collect();
        build_value_aliases(
            &values,
            &payload_text,
            options.value_min_freq,
            options.min_len,
        )?
    } else {
        indexmap::IndexMap::new()
    };

    let body_payload = render_body(&records, &columns, &value_aliases);
    let digest = checksum(&body_payload);

    let column_types: Vec<(String, ColumnType)> = columns
        .iter()
        .map(|(field, short)| {
            let cells = records.iter().filter_map(|record| record.get(field));
            (short.clone(), ColumnType::infer(cells))
        })
        .collect();

    let passthrough = collect_passthrough(root);
    let meta_text = meta::compose(
        &digest,
        &columns,
        &value_aliases,
        &column_types,
        &passthrough,
    );
    let body_text = format!("{}{}", meta::BODY_PREFIX, body_payload);

    debug!(
        records = records.len(),
        fields = columns.len(),
        interned = value_aliases.len(),
        checksum = %digest,
        "encoded COIL table"
    );

    let mut out = root.clone();
    let mut data_obj = serde_json::Map::with_capacity(2);
    data_obj.insert("meta".to_string(), Value::String(meta_text));
    data_obj.insert("body".to_string(), Value::String(body_text));
    out.insert("data".to_string(), Value::Object(data_obj));
    Ok(Value::Object(out))
}

/// Recognizes the table inside `data`: either a list of record objects, or
/// a single-key object wrapping such a list.
fn extract_table(data: &Value) -> Result<Vec<Record>> {
    let unsupported = |value: &Value| {
        Error::structural(format!(
            "unsupported 'data' structure: expected a list of records or a \
             single-key object wrapping one, found {}",
            json_kind(value)
        ))
    };
    let list = match data {
        Value::Array(items) => items,
        Value::Object(map) => match (map.len(), map.iter().next()) {
            (1, Some((key, inner))) => inner.as_array().ok_or_else(|| {
                Error::structural(format!(
                    "'data.{key}' must be a list of records, found {}",
                    json_kind(inner)
                ))
            })?,
            _ => return Err(unsupported(data)),
        },
        other => return Err(unsupported(other)),
    };
    list.iter().map(Record::from_json).collect()
}

/// Sorted union of field names across all records.
fn field_census(records: &[Record]) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();
    for record in records {
        for field in record.keys() {
            names.insert(field.clone());
        }
    }
    for field in &names {
        if field.contains('&') || field.contains(';') {
            return Err(Error::structural(format!(
                "field name {field:?} cannot be represented in META"
            )));
        }
    }
    Ok(names.into_iter().collect())
}

/// Captures every top-level key except `data` for the meta passthrough.
///
/// Keys or values the meta grammar cannot carry are skipped; they still
/// round-trip whenever the transport keeps the whole document.
fn collect_passthrough(root: &serde_json::Map<String, Value>) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for (key, value) in root {
        if key == "data" {
            continue;
        }
        if key.contains('&')
            || key.contains('=')
            || RESERVED_META_KEYS.contains(&key.as_str())
        {
            debug!(key = %key, "skipping passthrough key the META grammar cannot carry");
            continue;
        }
        let Ok(text) = serde_json::to_string(value) else {
            continue;
        };
        if text.contains('&') {
            debug!(key = %key, "skipping passthrough value containing '&'");
            continue;
        }
        entries.push((key.clone(), text));
    }
    entries
}
