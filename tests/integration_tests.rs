use coil_codec::{decode, encode, encode_with_options, EncodeOptions, Error};
use serde_json::{json, Value};

fn roundtrip(doc: &Value) -> Value {
    let encoded = encode(doc).unwrap();
    decode(&encoded).unwrap()
}

#[test]
fn test_sensor_timeseries() {
    let doc = json!({
        "device": "iot-22",
        "location": "warehouse-7",
        "data": {
            "readings": [
                {"ts": "2025-01-01", "temp": 34, "humidity": 60},
                {"ts": "2025-01-02", "temp": 35, "humidity": 58},
                {"ts": "2025-01-03", "temp": 33, "humidity": 61},
                {"ts": "2025-01-04", "temp": 36, "humidity": 59},
            ]
        }
    });
    let decoded = roundtrip(&doc);
    assert_eq!(decoded["data"]["sensordata"], doc["data"]["readings"]);
    assert_eq!(decoded["device"], doc["device"]);
    assert_eq!(decoded["location"], doc["location"]);
}

#[test]
fn test_payment_transactions() {
    let doc = json!({
        "service": "payment-gateway",
        "data": {
            "transactions": [
                {"id": "TX1", "method": "UPI", "status": "SUCCESS", "amount": 499},
                {"id": "TX2", "method": "CARD", "status": "FAILED", "amount": 1299},
                {"id": "TX3", "method": "UPI", "status": "SUCCESS", "amount": 249},
                {"id": "TX4", "method": "UPI", "status": "SUCCESS", "amount": 499},
            ]
        }
    });
    let decoded = roundtrip(&doc);
    assert_eq!(decoded["data"]["sensordata"], doc["data"]["transactions"]);
}

#[test]
fn test_boolean_columns() {
    let doc = json!({
        "data": [
            {"user": "alice", "action": "login", "success": true},
            {"user": "bob", "action": "login", "success": false},
            {"user": "alice", "action": "logout", "success": true},
        ]
    });
    let decoded = roundtrip(&doc);
    assert_eq!(decoded["data"]["sensordata"], doc["data"]);
    assert_eq!(decoded["data"]["sensordata"][0]["success"], json!(true));
}

#[test]
fn test_float_columns() {
    let doc = json!({
        "data": [
            {"price": 9.99, "qty": 2},
            {"price": 14.5, "qty": 10},
            {"price": 2.0, "qty": 3},
        ]
    });
    let decoded = roundtrip(&doc);
    assert_eq!(decoded["data"]["sensordata"], doc["data"]);
}

#[test]
fn test_repeated_value_interning_scenario() {
    // "34" repeats and gets interned; the dates appear once and stay literal
    let doc = json!({
        "data": [
            {"ts": "2025-01-01", "temp": 34},
            {"ts": "2025-01-02", "temp": 34},
        ]
    });
    let encoded = encode(&doc).unwrap();
    let meta = encoded["data"]["meta"].as_str().unwrap();
    assert!(meta.contains("vmap="), "expected an interned value: {meta}");

    let body = encoded["data"]["body"].as_str().unwrap();
    assert!(body.contains("2025-01-01"), "singleton values stay literal");

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded["data"]["sensordata"], doc["data"]);
}

#[test]
fn test_delimiters_in_values() {
    let doc = json!({
        "data": [
            {"note": "a|b"},
            {"note": "k:v, and more"},
            {"note": "back\\slash"},
        ]
    });
    let encoded = encode(&doc).unwrap();
    let body = encoded["data"]["body"].as_str().unwrap();
    assert!(body.contains("a\\|b"));

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded["data"]["sensordata"], doc["data"]);
}

#[test]
fn test_missing_fields_become_empty_strings() {
    let doc = json!({
        "data": [
            {"a": "1", "b": "2"},
            {"a": "3"},
        ]
    });
    let decoded = roundtrip(&doc);
    assert_eq!(decoded["data"]["sensordata"][0]["b"], "2");
    assert_eq!(decoded["data"]["sensordata"][1]["b"], "");
}

#[test]
fn test_null_cells_become_empty_strings() {
    let doc = json!({
        "data": [
            {"a": "x", "b": null},
            {"a": "y", "b": "z"},
        ]
    });
    let decoded = roundtrip(&doc);
    assert_eq!(decoded["data"]["sensordata"][0]["b"], "");
    assert_eq!(decoded["data"]["sensordata"][1]["b"], "z");
}

#[test]
fn test_unicode_values() {
    let doc = json!({
        "data": [
            {"city": "Zürich", "note": "ok ✓"},
            {"city": "Zürich", "note": "再見"},
        ]
    });
    let decoded = roundtrip(&doc);
    assert_eq!(decoded["data"]["sensordata"], doc["data"]);
}

#[test]
fn test_preferred_map_pins_tokens() {
    let doc = json!({
        "data": [
            {"temperature": "49", "place": "Madurai"},
            {"temperature": "35", "place": "Chennai"},
        ]
    });
    let options = EncodeOptions::new()
        .with_preferred_token("temperature", "Q")
        .with_preferred_token("place", "W");
    let encoded = encode_with_options(&doc, &options).unwrap();
    let meta = encoded["data"]["meta"].as_str().unwrap();
    assert!(meta.contains("Q:temperature"), "meta was: {meta}");
    assert!(meta.contains("W:place"), "meta was: {meta}");

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded["data"]["sensordata"], doc["data"]);
}

#[test]
fn test_compact_false_disables_interning() {
    let doc = json!({
        "data": [
            {"place": "Madurai"},
            {"place": "Madurai"},
            {"place": "Madurai"},
        ]
    });
    let options = EncodeOptions::new().with_compact(false);
    let encoded = encode_with_options(&doc, &options).unwrap();
    let meta = encoded["data"]["meta"].as_str().unwrap();
    assert!(!meta.contains("vmap="), "meta was: {meta}");

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded["data"]["sensordata"], doc["data"]);
}

#[test]
fn test_value_min_freq_threshold() {
    let doc = json!({
        "data": [
            {"place": "Madurai"},
            {"place": "Madurai"},
        ]
    });
    let options = EncodeOptions::new().with_value_min_freq(3);
    let encoded = encode_with_options(&doc, &options).unwrap();
    assert!(!encoded["data"]["meta"].as_str().unwrap().contains("vmap="));
}

#[test]
fn test_sibling_keys_restored_from_meta_when_stripped() {
    let doc = json!({
        "device": "iot-22",
        "threshold": 42,
        "data": [
            {"a": "1"},
            {"a": "2"},
        ]
    });
    let encoded = encode(&doc).unwrap();
    // simulate a transport that only carries the data subtree
    let stripped = json!({"data": encoded["data"]});
    let decoded = decode(&stripped).unwrap();
    assert_eq!(decoded["device"], json!("iot-22"));
    assert_eq!(decoded["threshold"], json!(42));
}

#[test]
fn test_sibling_keys_in_document_win_over_meta() {
    let doc = json!({
        "device": "iot-22",
        "data": [{"a": "1"}]
    });
    let mut encoded = encode(&doc).unwrap();
    // the live document was edited after encoding; decode keeps the edit
    encoded["device"] = json!("iot-99");
    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded["device"], json!("iot-99"));
}

#[test]
fn test_record_order_preserved() {
    let doc = json!({
        "data": (0..50)
            .map(|i| json!({"seq": i, "tag": "row"}))
            .collect::<Vec<_>>()
    });
    let decoded = roundtrip(&doc);
    let rows = decoded["data"]["sensordata"].as_array().unwrap();
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row["seq"], json!(i));
    }
}

#[test]
fn test_empty_table() {
    let doc = json!({"data": []});
    let decoded = roundtrip(&doc);
    assert_eq!(decoded["data"]["sensordata"], json!([]));
}

#[test]
fn test_decode_rejects_raw_documents() {
    let doc = json!({"data": [{"a": 1}]});
    assert!(matches!(decode(&doc), Err(Error::Structural(_))));
}

#[test]
fn test_decode_rejects_extra_data_keys() {
    let doc = json!({
        "data": {"meta": "META&checksum=0&map=A:a", "body": "BODY|x", "extra": 1}
    });
    assert!(matches!(decode(&doc), Err(Error::Structural(_))));
}

#[test]
fn test_legacy_document_decodes_as_strings() {
    // hand-built the way older encoders wrote it: no types entry,
    // raw (unquoted) passthrough values
    let body_payload = "sensordata[2]{T,P}|T:49,P:mdu|T:35,P:mdu";
    // CRC-32 of the payload above
    let meta = "META&checksum=25217899&map=P:place;T:temperature&vmap=mdu:Madurai&q=2025";
    let doc = json!({"data": {"meta": meta, "body": format!("BODY|{body_payload}")}});

    let decoded = decode(&doc).unwrap();
    assert_eq!(decoded["data"]["sensordata"][0]["temperature"], "49");
    assert_eq!(decoded["data"]["sensordata"][0]["place"], "Madurai");
    assert_eq!(decoded["data"]["sensordata"][1]["place"], "Madurai");
    assert_eq!(decoded["q"], json!(2025));
}
