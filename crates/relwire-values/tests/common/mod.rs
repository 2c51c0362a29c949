#![allow(dead_code)]

use relwire_values::{RelationCommandSet, ValueBag};
use serde_json::Value;

pub fn wire(set: &RelationCommandSet) -> Value {
    Value::Array(set.render().unwrap())
}

pub fn object(bag: &ValueBag, exclude: &[&str]) -> Value {
    Value::Object(bag.to_wire(exclude).unwrap())
}

pub fn partner(name: &str) -> ValueBag {
    ValueBag::new().put("name", name).put("active", true)
}
