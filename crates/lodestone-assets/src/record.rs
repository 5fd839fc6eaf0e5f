//! Hierarchical data records - the persisted configuration carrier.
//!
//! A [`DataRecord`] is a named block of key/value fields plus an ordered
//! list of child records. It is the shape asset metadata is persisted in
//! and the in-memory configuration a unit is hydrated from: a source's
//! metadata record holds an `assetUnits` child, and each of *its* children
//! describes one unit, named by the unit's kind tag.
//!
//! Child names may repeat (two units of the same kind under one source are
//! legal), which is why children are an ordered list rather than a map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved field key for a unit's persisted numeric id.
pub const AUID_KEY: &str = "auid";

/// Reserved field key for a unit's persisted name.
pub const NAME_KEY: &str = "name";

/// Reserved child-record name grouping a source's unit records.
pub const ASSET_UNITS_KEY: &str = "assetUnits";

/// A single field value inside a [`DataRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    U32(u32),
    F32(f32),
    Str(String),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// A named block of fields and child records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    fields: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<DataRecord>,
}

impl DataRecord {
    /// Create an empty record with the given block name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// The block name. For a unit record this is the kind tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a field, replacing any previous value under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field, returning its previous value if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    /// Check whether a field is present.
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Get a raw field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Get an unsigned integer field.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        match self.fields.get(key) {
            Some(Value::U32(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get a float field.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        match self.fields.get(key) {
            Some(Value::F32(v)) => Some(*v),
            Some(Value::U32(v)) => Some(*v as f32),
            _ => None,
        }
    }

    /// Get a boolean field.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.fields.get(key) {
            Some(Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Iterate the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append a child record.
    pub fn add_child(&mut self, child: DataRecord) -> &mut DataRecord {
        self.children.push(child);
        self.children.last_mut().expect("just pushed")
    }

    /// Get the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&DataRecord> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Get the first child with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut DataRecord> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Get the first child with the given name, creating it if absent.
    pub fn ensure_child(&mut self, name: &str) -> &mut DataRecord {
        if let Some(idx) = self.children.iter().position(|c| c.name == name) {
            &mut self.children[idx]
        } else {
            self.add_child(DataRecord::new(name))
        }
    }

    /// Iterate all children in order.
    pub fn children(&self) -> impl Iterator<Item = &DataRecord> {
        self.children.iter()
    }

    /// Check whether the record has no fields and no children.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trip() {
        let mut record = DataRecord::new("shader");
        record.set("name", "water");
        record.set(AUID_KEY, 7u32);
        record.set("twoSided", true);
        record.set("lodBias", 0.5f32);

        assert_eq!(record.get_str("name"), Some("water"));
        assert_eq!(record.get_u32(AUID_KEY), Some(7));
        assert_eq!(record.get_bool("twoSided"), Some(true));
        assert_eq!(record.get_f32("lodBias"), Some(0.5));

        assert_eq!(record.remove(AUID_KEY), Some(Value::U32(7)));
        assert!(!record.has(AUID_KEY));
    }

    #[test]
    fn test_typed_getter_mismatch() {
        let mut record = DataRecord::new("shader");
        record.set("name", "water");
        assert_eq!(record.get_u32("name"), None);
        assert_eq!(record.get_str("missing"), None);
    }

    #[test]
    fn test_duplicate_child_names() {
        let mut meta = DataRecord::new("meta");
        let units = meta.ensure_child(ASSET_UNITS_KEY);
        units.add_child(DataRecord::new("shader"));
        units.add_child(DataRecord::new("shader"));
        units.add_child(DataRecord::new("renderMesh"));

        let units = meta.child(ASSET_UNITS_KEY).unwrap();
        assert_eq!(units.children().count(), 3);
        // child() resolves to the first match only
        assert_eq!(units.child("shader").map(|c| c.name()), Some("shader"));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut record = DataRecord::new("systemCursor");
        record.set(AUID_KEY, 42u32);
        record.set("hotspotX", 4u32);
        record.add_child(DataRecord::new("extra"));

        let json = serde_json::to_string(&record).unwrap();
        let back: DataRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.get_u32("hotspotX"), Some(4));
    }
}
