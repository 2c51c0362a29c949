mod common;
use common::*;

use std::collections::HashMap;

use relwire_values::*;
use serde_json::json;

#[test]
fn scalar_and_relation_fields() {
    let bag = ValueBag::new()
        .put("name", "Bob")
        .put("tags", RelationCommandSet::new().replace([1, 2]));
    assert_eq!(object(&bag, &[]), json!({ "name": "Bob", "tags": [[6, 0, [1, 2]]] }));
}

#[test]
fn exclusion_applies_to_every_value_kind() {
    let bag = ValueBag::new()
        .put("_id", 4_i64)
        .put("name", "Bob")
        .put("child_ids", RelationCommandSet::new().link(1));
    assert_eq!(
        object(&bag, &["_id"]),
        json!({ "name": "Bob", "child_ids": [[4, 1, 0]] })
    );
    assert_eq!(object(&bag, &["child_ids", "_id"]), json!({ "name": "Bob" }));
}

#[test]
fn serialization_leaves_bag_untouched() {
    let bag = ValueBag::new()
        .put("name", "Bob")
        .put("line_ids", RelationCommandSet::new().update(3, partner("L")));
    let before = bag.clone();
    let first = object(&bag, &["name"]);
    let second = object(&bag, &["name"]);
    assert_eq!(first, second);
    assert_eq!(bag, before);
}

#[test]
fn put_all_overwrites_on_collision() {
    let mut bag = ValueBag::new().put("name", "Bob").put("city", "Austin");
    let mut extra: HashMap<String, FieldValue> = HashMap::new();
    extra.insert("city".into(), "Dallas".into());
    extra.insert("zip".into(), 75201_i32.into());
    bag.put_all(extra);
    assert_eq!(
        object(&bag, &[]),
        json!({ "name": "Bob", "city": "Dallas", "zip": 75201 })
    );
}

#[test]
fn data_exposes_raw_values() {
    let set = RelationCommandSet::new().link(2);
    let bag = ValueBag::new().put("ids", set.clone()).put("n", 1_i32);
    assert_eq!(bag.data().len(), 2);
    assert_eq!(bag.data()["ids"].as_relation(), Some(&set));
    assert_eq!(bag.data()["n"].as_scalar(), Some(&Bson::Int32(1)));
}

#[test]
fn unrepresentable_value_fails_whole_object() {
    let bag = ValueBag::new()
        .put("name", "Bob")
        .put("blob", Bson::Binary(bson::Binary {
            subtype: bson::spec::BinarySubtype::Generic,
            bytes: vec![1, 2, 3],
        }));
    let err = bag.to_wire(&[]).unwrap_err();
    assert!(matches!(err, WireError::Serialization(_)), "{err}");
}

#[test]
fn failure_inside_nested_relation_surfaces() {
    let bag = ValueBag::new().put(
        "line_ids",
        RelationCommandSet::new().add(ValueBag::new().put("price", f64::INFINITY)),
    );
    assert!(matches!(
        bag.to_wire(&[]).unwrap_err(),
        WireError::Serialization(_)
    ));
}

#[test]
fn bag_embeds_in_request_structs() {
    #[derive(serde::Serialize)]
    struct WriteRequest<'a> {
        model: &'a str,
        ids: Vec<i64>,
        values: &'a ValueBag,
    }
    let values = ValueBag::new()
        .put("name", "Bob")
        .put("category_id", RecordId::new(3));
    let request = WriteRequest {
        model: "res.partner",
        ids: vec![7],
        values: &values,
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({ "model": "res.partner", "ids": [7], "values": { "name": "Bob", "category_id": 3 } })
    );
}
