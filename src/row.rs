//! Hydrated rows and hydration targets.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sql_types::RowValue;
use std::collections::{BTreeMap, HashMap};

/// A container a row's columns can be written into, one field at a time.
///
/// Fields are set in column order. Setting a label twice keeps the last
/// value.
pub trait RowTarget {
    fn set_field(&mut self, label: &str, value: RowValue);
}

/// Generic open-ended record: label → value, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, RowValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the field called `label`.
    pub fn get(&self, label: &str) -> Option<&RowValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Render as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl RowTarget for Row {
    fn set_field(&mut self, label: &str, value: RowValue) {
        match self.fields.iter_mut().find(|(name, _)| name == label) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((label.to_string(), value)),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl IntoIterator for Row {
    type Item = (String, RowValue);
    type IntoIter = std::vec::IntoIter<(String, RowValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl RowTarget for HashMap<String, RowValue> {
    fn set_field(&mut self, label: &str, value: RowValue) {
        self.insert(label.to_string(), value);
    }
}

impl RowTarget for BTreeMap<String, RowValue> {
    fn set_field(&mut self, label: &str, value: RowValue) {
        self.insert(label.to_string(), value);
    }
}

impl RowTarget for serde_json::Map<String, serde_json::Value> {
    fn set_field(&mut self, label: &str, value: RowValue) {
        self.insert(label.to_string(), value.to_json());
    }
}
