//! Property-based tests for the core codec guarantees: escaping is a
//! bijection, and table-shaped documents with uniformly-typed columns
//! round-trip exactly across a wide range of generated inputs.

use coil_codec::escape::{escape, unescape};
use coil_codec::{decode, encode};
use proptest::collection::{hash_set, vec};
use proptest::prelude::*;
use serde_json::{json, Value};

fn table_doc<T: Clone + serde::Serialize>(names: &[String], rows: &[Vec<T>]) -> Value {
    let records: Vec<Value> = rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for (name, cell) in names.iter().zip(row) {
                obj.insert(name.clone(), json!(cell.clone()));
            }
            Value::Object(obj)
        })
        .collect();
    json!({"data": records})
}

fn assert_table_roundtrip(doc: &Value) -> Result<(), TestCaseError> {
    let encoded = encode(doc).unwrap();
    let decoded = decode(&encoded).unwrap();
    prop_assert_eq!(&decoded["data"]["sensordata"], &doc["data"]);
    Ok(())
}

fn string_table() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    hash_set("[a-z]{2,6}", 1..4usize).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let width = names.len();
        (
            Just(names),
            vec(vec("[ -~]{0,12}", width..=width), 1..8usize),
        )
    })
}

fn int_table() -> impl Strategy<Value = (Vec<String>, Vec<Vec<i64>>)> {
    hash_set("[a-z]{2,6}", 1..4usize).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let width = names.len();
        (
            Just(names),
            vec(vec(any::<i64>(), width..=width), 1..8usize),
        )
    })
}

fn bool_table() -> impl Strategy<Value = (Vec<String>, Vec<Vec<bool>>)> {
    hash_set("[a-z]{2,6}", 1..4usize).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let width = names.len();
        (
            Just(names),
            vec(vec(any::<bool>(), width..=width), 1..8usize),
        )
    })
}

proptest! {
    #[test]
    fn prop_escape_roundtrip_any_string(s in any::<String>()) {
        prop_assert_eq!(unescape(&escape(&s)), s);
    }

    #[test]
    fn prop_escape_roundtrip_delimiter_heavy(s in "[a-z:,|\\\\]{0,40}") {
        prop_assert_eq!(unescape(&escape(&s)), s);
    }

    #[test]
    fn prop_escape_leaves_clean_text_alone(s in "[a-zA-Z0-9 ]{0,40}") {
        prop_assert_eq!(escape(&s), s);
    }

    #[test]
    fn prop_string_tables_roundtrip((names, rows) in string_table()) {
        assert_table_roundtrip(&table_doc(&names, &rows))?;
    }

    #[test]
    fn prop_int_tables_roundtrip((names, rows) in int_table()) {
        assert_table_roundtrip(&table_doc(&names, &rows))?;
    }

    #[test]
    fn prop_bool_tables_roundtrip((names, rows) in bool_table()) {
        assert_table_roundtrip(&table_doc(&names, &rows))?;
    }

    #[test]
    fn prop_no_alias_token_leaks_into_payload(
        (names, rows) in string_table()
    ) {
        let doc = table_doc(&names, &rows);
        let payload_text = serde_json::to_string(&doc).unwrap().to_lowercase();
        let encoded = encode(&doc).unwrap();
        let meta = encoded["data"]["meta"].as_str().unwrap();
        for entry in meta.strip_prefix("META&").unwrap().split('&') {
            let Some((key, value)) = entry.split_once('=') else { continue };
            if key != "map" && key != "vmap" {
                continue;
            }
            for pair in value.split(';') {
                if let Some((token, _)) = pair.split_once(':') {
                    prop_assert!(
                        !payload_text.contains(&token.to_lowercase()),
                        "token {} appears in payload", token
                    );
                }
            }
        }
    }
}
