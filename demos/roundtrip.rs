//! End-to-end walkthrough: encode a sensor document, inspect the wire form,
//! decode it back, and verify the record list survived exactly.
//!
//! Run with: `cargo run --example roundtrip`

use coil_codec::{decode, encode};
use serde_json::json;

fn main() {
    let payload = json!({
        "device": "sensor-xyz",
        "area": "Tamilnadu",
        "data": {
            "sensordata": [
                {"temperature": "49", "Time": "3-8-2025", "place": "Madurai"},
                {"temperature": "35", "Time": "5-9-2025", "place": "Chennai"},
                {"temperature": "35", "Time": "2-3-2025", "place": "Madurai"},
                {"temperature": "42", "Time": "11-1-2024", "place": "Coimbatore"},
                {"temperature": "39", "Time": "14-2-2024", "place": "Trichy"},
                {"temperature": "51", "Time": "9-3-2024", "place": "Salem"},
            ]
        }
    });

    println!("=== ORIGINAL ===");
    println!("{}", serde_json::to_string_pretty(&payload).unwrap());

    let encoded = encode(&payload).expect("encoding failed");
    println!("\n=== ENCODED (send to the LLM) ===");
    println!("{}", serde_json::to_string_pretty(&encoded).unwrap());

    // simulate the consumer echoing the document back
    let decoded = decode(&encoded).expect("decoding failed");
    println!("\n=== DECODED ===");
    println!("{}", serde_json::to_string_pretty(&decoded).unwrap());

    assert_eq!(
        decoded["data"]["sensordata"], payload["data"]["sensordata"],
        "record list must survive the trip exactly"
    );
    assert_eq!(decoded["device"], payload["device"]);
    assert_eq!(decoded["area"], payload["area"]);
    println!("\nround-trip verified: record list identical");
}
