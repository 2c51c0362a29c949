use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::WireError;
use crate::value::{FieldValue, json_to_bson};

/// Field name to value map for a single record write.
///
/// Relation fields hold a [`RelationCommandSet`](crate::RelationCommandSet)
/// and are rendered to wire triples when the bag is converted with
/// [`to_wire`](Self::to_wire). Key order carries no meaning on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueBag {
    data: BTreeMap<String, FieldValue>,
}

impl ValueBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn put(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, returning the value it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.data.insert(key.into(), value.into())
    }

    /// Set `key` to any serde-serializable value.
    pub fn try_put<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, WireError> {
        let json =
            serde_json::to_value(value).map_err(|e| WireError::Serialization(e.to_string()))?;
        self.insert(key, json_to_bson(&json)?);
        Ok(self)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.data.remove(key)
    }

    /// Merge every entry into the bag, overwriting existing keys.
    pub fn put_all<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.data.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw underlying map.
    pub fn data(&self) -> &BTreeMap<String, FieldValue> {
        &self.data
    }

    /// Build the JSON wire object, leaving out the `exclude` keys.
    ///
    /// Either every retained field converts or the first failure is
    /// returned; no partial object is produced.
    pub fn to_wire(&self, exclude: &[&str]) -> Result<Map<String, Value>, WireError> {
        let mut object = Map::new();
        for (key, value) in &self.data {
            if exclude.contains(&key.as_str()) {
                continue;
            }
            let wire = value.to_wire().map_err(|e| annotate(e, key))?;
            object.insert(key.clone(), wire);
        }
        trace!(fields = object.len(), excluded = exclude.len(), "serialized value bag");
        Ok(object)
    }

    /// Build a bag of scalar fields from a JSON object.
    pub fn from_wire(object: &Map<String, Value>) -> Result<Self, WireError> {
        let mut bag = Self::new();
        for (key, value) in object {
            bag.insert(key.clone(), json_to_bson(value)?);
        }
        Ok(bag)
    }
}

fn annotate(error: WireError, key: &str) -> WireError {
    match error {
        WireError::Serialization(msg) => WireError::Serialization(format!("field {key:?}: {msg}")),
        other => other,
    }
}

impl Serialize for ValueBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let object = self.to_wire(&[]).map_err(serde::ser::Error::custom)?;
        object.serialize(serializer)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ValueBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.put_all(iter);
        bag
    }
}
