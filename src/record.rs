//! Ordered record type for COIL tables.
//!
//! A [`Record`] is one row of the table: an insertion-ordered mapping from
//! field name to [`Scalar`]. `IndexMap` keeps field order deterministic for
//! testing and debugging; equality is order-independent, so a decoded record
//! (whose fields come back in sorted column order) still compares equal to
//! the record it was encoded from.

use crate::value::{json_kind, Scalar};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One table row: an ordered map of field name to scalar cell.
///
/// # Examples
///
/// ```rust
/// use coil_codec::{Record, Scalar};
///
/// let mut record = Record::new();
/// record.insert("place".to_string(), Scalar::from("Madurai"));
/// record.insert("temperature".to_string(), Scalar::from(49));
///
/// assert_eq!(record.len(), 2);
/// assert_eq!(record.get("place").and_then(|v| v.as_str()), Some("Madurai"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(IndexMap<String, Scalar>);

impl Record {
    /// Creates an empty `Record`.
    #[must_use]
    pub fn new() -> Self {
        Record(IndexMap::new())
    }

    /// Creates an empty `Record` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Record(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field, returning the previous cell if the field existed.
    pub fn insert(&mut self, field: String, value: Scalar) -> Option<Scalar> {
        self.0.insert(field, value)
    }

    /// Returns a reference to the cell for `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field)
    }

    /// Returns the number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the field names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Scalar> {
        self.0.keys()
    }

    /// Returns an iterator over the (field, cell) pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Scalar> {
        self.0.iter()
    }

    /// Builds a record from one element of a table array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] if the element is not an object or if
    /// any of its values is an array or object.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            Error::structural(format!(
                "each record must be a JSON object, found {}",
                json_kind(value)
            ))
        })?;
        let mut record = Record::with_capacity(obj.len());
        for (field, cell) in obj {
            record.insert(field.clone(), Scalar::try_from(cell)?);
        }
        Ok(record)
    }

    /// Converts this record into a `serde_json::Value` object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::with_capacity(self.0.len());
        for (field, cell) in &self.0 {
            obj.insert(field.clone(), cell.to_json());
        }
        serde_json::Value::Object(obj)
    }
}

impl IntoIterator for Record {
    type Item = (String, Scalar);
    type IntoIter = indexmap::map::IntoIter<String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Scalar)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Scalar)>>(iter: T) -> Self {
        Record(IndexMap::from_iter(iter))
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, cell) in &self.0 {
            map.serialize_entry(field, cell)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = IndexMap::<String, Scalar>::deserialize(deserializer)?;
        Ok(Record(entries))
    }
}
