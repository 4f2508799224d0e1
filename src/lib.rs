//! # coil_codec
//!
//! A schema-aware text compaction codec for the COIL format.
//!
//! ## What is COIL?
//!
//! COIL compacts semi-structured JSON whose payload is a table of uniform
//! records (rows). Field names become short uppercase aliases, values
//! repeated across rows become short lowercase tokens, and the rows collapse
//! into a pipe-delimited line grammar. The encoding is fully
//! self-describing: a `meta` string carries the checksum, the alias tables,
//! column type tags, and the document's sibling keys, so a symmetric decoder
//! reconstructs the record list exactly with no out-of-band state.
//!
//! The point of the exercise is token efficiency: tabular JSON repeats its
//! keys once per row, and a size-constrained consumer (an LLM prompt) pays
//! for every repetition. COIL pays for each key and each repeated value
//! once, in the alias tables.
//!
//! ## Key Properties
//!
//! - **Lossless**: `decode(encode(doc))` reproduces the record list exactly
//!   for any recognized table with uniformly-typed columns
//! - **Self-Describing**: everything needed to decode travels in the
//!   document itself; decode takes no options
//! - **Tamper-Evident**: a CRC-32 checksum over the body payload is
//!   verified before any parsing; a single flipped character fails the call
//! - **Collision-Safe**: no alias token appears anywhere in the original
//!   payload text, so substitution is never ambiguous
//! - **Stateless**: alias tables live for one call; concurrent callers
//!   never coordinate
//!
//! ## Quick Start
//!
//! ```rust
//! use coil_codec::{decode, encode};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "device": "iot-22",
//!     "data": {
//!         "sensordata": [
//!             {"temperature": 49, "place": "Madurai"},
//!             {"temperature": 35, "place": "Chennai"},
//!             {"temperature": 35, "place": "Madurai"},
//!         ]
//!     }
//! });
//!
//! let encoded = encode(&doc).unwrap();
//! // encoded["data"] is now {"meta": "META&…", "body": "BODY|…"}
//! assert!(encoded["data"]["meta"].as_str().unwrap().starts_with("META&"));
//!
//! let decoded = decode(&encoded).unwrap();
//! assert_eq!(decoded["data"]["sensordata"], doc["data"]["sensordata"]);
//! assert_eq!(decoded["device"], doc["device"]);
//! ```
//!
//! ## Document Contract
//!
//! Encode looks at the `data` key of the input object. A table is recognized
//! when `data` is a list of record objects, or a single-key object wrapping
//! such a list; any other `data` shape is a structural error, and a document
//! without `data` passes through unchanged. Record cells must be scalars
//! (string, number, bool, or null — null encodes as the empty string).
//!
//! Decode requires `data` to be exactly `{"meta", "body"}` and replaces it
//! with `{"sensordata": [record, …]}`. Sibling top-level keys are preserved
//! verbatim; keys the transport stripped are restored from meta.
//!
//! ## Errors
//!
//! Every error is terminal for the call — there is no partial decode. See
//! [`Error`] for the taxonomy; callers transmitting COIL opportunistically
//! fall back to raw JSON when a call fails.

mod decode;
mod encode;
pub mod error;
pub mod escape;
mod intern;
mod meta;
pub mod options;
pub mod record;
mod row;
mod token;
pub mod value;

pub use error::{Error, Result};
pub use options::EncodeOptions;
pub use record::Record;
pub use value::{ColumnType, Number, Scalar};

use serde_json::Value;

/// Encodes a JSON document's `data` table into COIL form with default
/// options.
///
/// Non-`data` keys are preserved verbatim and additionally captured in meta
/// so they survive a transport that carries only the `data` subtree.
///
/// # Examples
///
/// ```rust
/// use coil_codec::encode;
/// use serde_json::json;
///
/// let doc = json!({
///     "data": [
///         {"ts": "2025-01-01", "temp": 34},
///         {"ts": "2025-01-02", "temp": 34},
///     ]
/// });
/// let encoded = encode(&doc).unwrap();
/// assert!(encoded["data"]["body"].as_str().unwrap().starts_with("BODY|"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Structural`] when the document is not an object, when
/// `data` has an unrecognized shape, or when a record holds non-scalar
/// values; [`Error::TokenSpaceExhausted`] when collision avoidance runs out
/// of retry budget.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(doc: &Value) -> Result<Value> {
    encode_with_options(doc, &EncodeOptions::default())
}

/// Encodes with explicit [`EncodeOptions`].
///
/// # Examples
///
/// ```rust
/// use coil_codec::{encode_with_options, EncodeOptions};
/// use serde_json::json;
///
/// let doc = json!({"data": [{"city": "Pune"}, {"city": "Pune"}]});
/// let options = EncodeOptions::new().with_compact(false);
/// let encoded = encode_with_options(&doc, &options).unwrap();
/// // interning disabled: no vmap entry in meta
/// assert!(!encoded["data"]["meta"].as_str().unwrap().contains("vmap="));
/// ```
///
/// # Errors
///
/// Same conditions as [`encode()`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options(doc: &Value, options: &EncodeOptions) -> Result<Value> {
    encode::encode_document(doc, options)
}

/// Decodes a COIL document back into plain JSON.
///
/// Verifies the body checksum before parsing anything; resolves field and
/// value aliases through the maps in meta; restores column types; replaces
/// `data` with `{"sensordata": [record, …]}`.
///
/// # Examples
///
/// ```rust
/// use coil_codec::{decode, encode};
/// use serde_json::json;
///
/// let doc = json!({"data": [{"note": "a|b"}]});
/// let decoded = decode(&encode(&doc).unwrap()).unwrap();
/// assert_eq!(decoded["data"]["sensordata"][0]["note"], "a|b");
/// ```
///
/// # Errors
///
/// Returns [`Error::Structural`] when `data` is not exactly
/// `{"meta","body"}`, [`Error::Format`] on missing markers or malformed
/// grammar, and [`Error::ChecksumMismatch`] when the body was altered.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(doc: &Value) -> Result<Value> {
    decode::decode_document(doc)
}

/// Encodes a JSON text, returning the encoded document as compact JSON text.
///
/// # Examples
///
/// ```rust
/// use coil_codec::encode_str;
///
/// let encoded = encode_str(r#"{"data": [{"x": 1}]}"#).unwrap();
/// assert!(encoded.contains("META&"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Json`] when the input is not valid JSON, plus the same
/// conditions as [`encode()`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_str(input: &str) -> Result<String> {
    let doc: Value = serde_json::from_str(input).map_err(Error::json)?;
    let encoded = encode(&doc)?;
    serde_json::to_string(&encoded).map_err(Error::json)
}

/// Decodes a COIL document from JSON text, returning compact JSON text.
///
/// # Errors
///
/// Returns [`Error::Json`] when the input is not valid JSON, plus the same
/// conditions as [`decode()`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_str(input: &str) -> Result<String> {
    let doc: Value = serde_json::from_str(input).map_err(Error::json)?;
    let decoded = decode(&doc)?;
    serde_json::to_string(&decoded).map_err(Error::json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_decode_roundtrip() {
        let doc = json!({
            "device": "iot-22",
            "data": {
                "sensordata": [
                    {"temperature": "49", "Time": "3-8-2025", "place": "Madurai"},
                    {"temperature": "35", "Time": "5-9-2025", "place": "Chennai"},
                    {"temperature": "35", "Time": "2-3-2025", "place": "Madurai"},
                ]
            }
        });
        let encoded = encode(&doc).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded["data"]["sensordata"], doc["data"]["sensordata"]);
        assert_eq!(decoded["device"], doc["device"]);
    }

    #[test]
    fn test_document_without_data_passes_through() {
        let doc = json!({"status": "ok"});
        assert_eq!(encode(&doc).unwrap(), doc);
    }

    #[test]
    fn test_bare_list_data() {
        let doc = json!({"data": [{"a": 1}, {"a": 2}]});
        let decoded = decode(&encode(&doc).unwrap()).unwrap();
        assert_eq!(decoded["data"]["sensordata"], doc["data"]);
    }

    #[test]
    fn test_encode_str_decode_str() {
        let input = r#"{"data":[{"x":"1"},{"x":"2"}]}"#;
        let encoded = encode_str(input).unwrap();
        let decoded = decode_str(&encoded).unwrap();
        let value: Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(value["data"]["sensordata"][1]["x"], "2");
    }

    #[test]
    fn test_encode_rejects_non_object_document() {
        assert!(matches!(
            encode(&json!([1, 2, 3])),
            Err(Error::Structural(_))
        ));
    }

    #[test]
    fn test_encode_rejects_bad_data_shapes() {
        for doc in [
            json!({"data": "text"}),
            json!({"data": 42}),
            json!({"data": {"a": [], "b": []}}),
            json!({"data": {"table": "not a list"}}),
            json!({"data": [{"nested": {"x": 1}}]}),
            json!({"data": [42]}),
        ] {
            assert!(
                matches!(encode(&doc), Err(Error::Structural(_))),
                "accepted {doc}"
            );
        }
    }
}
