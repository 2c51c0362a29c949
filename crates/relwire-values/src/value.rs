use bson::{Bson, Document};
use serde_json::{Map, Number, Value};

use crate::error::WireError;
use crate::id::RecordId;
use crate::relation::RelationCommandSet;

/// A value stored in a [`ValueBag`](crate::ValueBag).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A plain field value: scalar, list or embedded document.
    Scalar(Bson),
    /// Commands for a relation field, rendered to wire triples on output.
    Relation(RelationCommandSet),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&Bson> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            FieldValue::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationCommandSet> {
        match self {
            FieldValue::Relation(set) => Some(set),
            FieldValue::Scalar(_) => None,
        }
    }

    /// Wire form of this value. Relation sets are rendered in place.
    pub fn to_wire(&self) -> Result<Value, WireError> {
        match self {
            FieldValue::Scalar(value) => bson_to_wire(value),
            FieldValue::Relation(set) => set.render().map(Value::Array),
        }
    }
}

impl From<Bson> for FieldValue {
    fn from(value: Bson) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Document> for FieldValue {
    fn from(doc: Document) -> Self {
        FieldValue::Scalar(Bson::Document(doc))
    }
}

impl From<RelationCommandSet> for FieldValue {
    fn from(set: RelationCommandSet) -> Self {
        FieldValue::Relation(set)
    }
}

impl From<RecordId> for FieldValue {
    fn from(id: RecordId) -> Self {
        FieldValue::Scalar(Bson::Int64(id.get()))
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Scalar(Bson::from(value))
                }
            }
        )*
    };
}

scalar_from!(&str, String, i32, i64, f64, bool, Vec<Bson>);

/// Convert a BSON value to its JSON wire form.
///
/// Accepts the types the remote API understands: strings, integers, finite
/// doubles, booleans, null, date-times, arrays and embedded documents.
/// Date-times are written as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn bson_to_wire(value: &Bson) -> Result<Value, WireError> {
    match value {
        Bson::String(s) => Ok(Value::String(s.clone())),
        Bson::Int32(n) => Ok(Value::from(*n)),
        Bson::Int64(n) => Ok(Value::from(*n)),
        Bson::Double(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| WireError::Serialization(format!("non-finite number: {f}"))),
        Bson::Boolean(b) => Ok(Value::Bool(*b)),
        Bson::Null => Ok(Value::Null),
        Bson::DateTime(dt) => format_datetime(*dt).map(Value::String),
        Bson::Array(items) => items
            .iter()
            .map(bson_to_wire)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Bson::Document(doc) => {
            let mut map = Map::new();
            for (key, item) in doc {
                map.insert(key.clone(), bson_to_wire(item)?);
            }
            Ok(Value::Object(map))
        }
        other => Err(WireError::Serialization(format!(
            "unsupported BSON type: {:?}",
            other.element_type()
        ))),
    }
}

/// Convert a JSON value into BSON for storage in a bag.
///
/// Integers that fit in 32 bits become `Int32`, larger ones `Int64`.
pub fn json_to_bson(value: &Value) -> Result<Bson, WireError> {
    match value {
        Value::Null => Ok(Bson::Null),
        Value::Bool(b) => Ok(Bson::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i32::try_from(i).map_or(Bson::Int64(i), Bson::Int32))
            } else if n.is_u64() {
                Err(WireError::Serialization(format!("integer out of range: {n}")))
            } else {
                n.as_f64()
                    .map(Bson::Double)
                    .ok_or_else(|| WireError::Serialization(format!("unrepresentable number: {n}")))
            }
        }
        Value::String(s) => Ok(Bson::String(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(json_to_bson)
            .collect::<Result<Vec<_>, _>>()
            .map(Bson::Array),
        Value::Object(map) => {
            let mut doc = Document::new();
            for (key, item) in map {
                doc.insert(key.clone(), json_to_bson(item)?);
            }
            Ok(Bson::Document(doc))
        }
    }
}

fn format_datetime(dt: bson::DateTime) -> Result<String, WireError> {
    let rfc3339 = dt
        .try_to_rfc3339_string()
        .map_err(|e| WireError::Serialization(format!("date-time out of range: {e}")))?;
    // YYYY-MM-DDTHH:MM:SS[.fff]Z
    match rfc3339.get(..19) {
        Some(head) if rfc3339.as_bytes().get(10) == Some(&b'T') => Ok(head.replacen('T', " ", 1)),
        _ => Err(WireError::Serialization(format!(
            "date-time out of range: {rfc3339}"
        ))),
    }
}
