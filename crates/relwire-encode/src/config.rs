use relwire_values::{FieldValue, ValueBag, json_to_bson, parse_commands};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::EncodeError;

/// Input document for the encoder.
///
/// ```json
/// { "values": { "name": "Bob", "tag_ids": [[4, 7, 0]] },
///   "relations": ["tag_ids"],
///   "exclude": ["id"] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncodeRequest {
    pub values: Map<String, Value>,
    /// Fields whose value is a wire array of relation commands.
    #[serde(default)]
    pub relations: Vec<String>,
    /// Fields left out of the output.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl EncodeRequest {
    pub fn to_bag(&self) -> Result<ValueBag, EncodeError> {
        for name in &self.relations {
            if !self.values.contains_key(name) {
                warn!(field = %name, "relation field has no value");
            }
        }

        let mut bag = ValueBag::new();
        for (key, value) in &self.values {
            let field = if self.relations.contains(key) {
                FieldValue::Relation(parse_commands(value)?)
            } else {
                FieldValue::Scalar(json_to_bson(value)?)
            };
            bag.insert(key.clone(), field);
        }
        Ok(bag)
    }
}
