//! COIL vs raw JSON size comparison over a growing sensor table.
//!
//! Token counts use the common ~4-chars-per-token heuristic; plug in a real
//! tokenizer for model-specific numbers.
//!
//! Run with: `cargo run --example token_savings`

use coil_codec::encode;
use serde_json::{json, Value};

const PLACES: [&str; 6] = [
    "Madurai",
    "Chennai",
    "Coimbatore",
    "Trichy",
    "Salem",
    "Erode",
];

fn sensor_doc(rows: usize) -> Value {
    let records: Vec<Value> = (0..rows)
        .map(|i| {
            json!({
                "temperature": format!("{}", 28 + (i * 7) % 28),
                "Time": format!("{}-{}-202{}", 1 + i % 28, 1 + i % 12, 3 + i % 4),
                "place": PLACES[i % PLACES.len()],
            })
        })
        .collect();
    json!({"device": "sensor-xyz", "data": {"sensordata": records}})
}

fn approx_tokens(text: &str) -> usize {
    ((text.len() + 3) / 4).max(1)
}

fn main() {
    println!(
        "{:>6} {:>12} {:>12} {:>14} {:>14} {:>9}",
        "rows", "json bytes", "coil bytes", "json ~tokens", "coil ~tokens", "savings"
    );
    for rows in [5, 30, 100, 500] {
        let doc = sensor_doc(rows);
        let raw = serde_json::to_string(&doc).unwrap();
        let encoded = encode(&doc).expect("encoding failed");
        let coil = serde_json::to_string(&encoded).unwrap();

        let raw_tokens = approx_tokens(&raw);
        let coil_tokens = approx_tokens(&coil);
        let savings = 100.0 * (1.0 - coil_tokens as f64 / raw_tokens as f64);

        println!(
            "{:>6} {:>12} {:>12} {:>14} {:>14} {:>8.1}%",
            rows,
            raw.len(),
            coil.len(),
            raw_tokens,
            coil_tokens,
            savings
        );
    }
}
