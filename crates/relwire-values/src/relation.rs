use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::trace;

use crate::bag::ValueBag;
use crate::command::RelCommand;
use crate::error::WireError;
use crate::id::{IntoRecordIds, RecordId};

/// Accumulates commands for one relation field and renders them as wire
/// triples.
///
/// Commands are grouped by kind. Kinds render in the order they were first
/// used; inside a kind, items keep call order. `remove_all` renders a single
/// `[5, 0, 0]` however often it is called, and every id passed to `replace`
/// lands in a single `[6, 0, ids]`.
///
/// ```
/// use relwire_values::RelationCommandSet;
///
/// let wire = RelationCommandSet::new().unlink(3).link(7).render().unwrap();
/// assert_eq!(serde_json::Value::Array(wire), serde_json::json!([[3, 3, 0], [4, 7, 0]]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationCommandSet {
    order: Vec<RelCommand>,
    add: Vec<ValueBag>,
    update: Vec<(RecordId, ValueBag)>,
    remove: Vec<RecordId>,
    unlink: Vec<RecordId>,
    link: Vec<RecordId>,
    replace: Vec<RecordId>,
}

impl RelationCommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from `values` and attach it.
    pub fn add(self, values: ValueBag) -> Self {
        self.add_all([values])
    }

    pub fn add_all(mut self, values: impl IntoIterator<Item = ValueBag>) -> Self {
        self.touch(RelCommand::Add);
        self.add.extend(values);
        self
    }

    /// Write `values` on the attached record `id`.
    pub fn update(mut self, id: impl Into<RecordId>, values: ValueBag) -> Self {
        self.touch(RelCommand::Update);
        self.update.push((id.into(), values));
        self
    }

    /// Detach every record.
    pub fn remove_all(mut self) -> Self {
        self.touch(RelCommand::RemoveAll);
        self
    }

    /// Detach records without deleting them.
    pub fn unlink(mut self, ids: impl IntoRecordIds) -> Self {
        self.touch(RelCommand::Unlink);
        self.unlink.extend(ids.into_record_ids());
        self
    }

    /// Attach existing records.
    pub fn link(mut self, ids: impl IntoRecordIds) -> Self {
        self.touch(RelCommand::Link);
        self.link.extend(ids.into_record_ids());
        self
    }

    /// Detach records and delete them.
    pub fn remove(mut self, ids: impl IntoRecordIds) -> Self {
        self.touch(RelCommand::Remove);
        self.remove.extend(ids.into_record_ids());
        self
    }

    /// Make the relation hold exactly the given ids. An empty list still
    /// emits `[6, 0, []]`.
    pub fn replace(mut self, ids: impl IntoRecordIds) -> Self {
        self.touch(RelCommand::Replace);
        self.replace.extend(ids.into_record_ids());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Command kinds present, in render order.
    pub fn commands(&self) -> impl Iterator<Item = RelCommand> + '_ {
        self.order.iter().copied()
    }

    /// Encode the accumulated commands as `[tag, id, payload]` triples.
    pub fn render(&self) -> Result<Vec<Value>, WireError> {
        let mut items = Vec::new();
        for &command in &self.order {
            match command {
                RelCommand::Add => {
                    for values in &self.add {
                        items.push(triple(command, RecordId::NEW, record_payload(values)?));
                    }
                }
                RelCommand::Update => {
                    for (id, values) in &self.update {
                        items.push(triple(command, *id, record_payload(values)?));
                    }
                }
                RelCommand::Remove => push_ids(&mut items, command, &self.remove),
                RelCommand::Unlink => push_ids(&mut items, command, &self.unlink),
                RelCommand::Link => push_ids(&mut items, command, &self.link),
                RelCommand::RemoveAll => {
                    items.push(triple(command, RecordId::NEW, Value::from(0)));
                }
                RelCommand::Replace => {
                    let ids = self.replace.iter().map(|&id| Value::from(id)).collect();
                    items.push(triple(command, RecordId::NEW, Value::Array(ids)));
                }
            }
        }
        trace!(kinds = self.order.len(), triples = items.len(), "rendered relation commands");
        Ok(items)
    }

    fn touch(&mut self, command: RelCommand) {
        if !self.order.contains(&command) {
            self.order.push(command);
        }
    }
}

fn triple(command: RelCommand, id: RecordId, payload: Value) -> Value {
    Value::Array(vec![Value::from(command.tag()), Value::from(id), payload])
}

fn record_payload(values: &ValueBag) -> Result<Value, WireError> {
    values.to_wire(&[]).map(Value::Object)
}

fn push_ids(items: &mut Vec<Value>, command: RelCommand, ids: &[RecordId]) {
    items.extend(ids.iter().map(|&id| triple(command, id, Value::from(0))));
}

impl Serialize for RelationCommandSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let items = self.render().map_err(serde::ser::Error::custom)?;
        items.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered(set: &RelationCommandSet) -> Value {
        Value::Array(set.render().unwrap())
    }

    #[test]
    fn empty_set_renders_nothing() {
        let set = RelationCommandSet::new();
        assert!(set.is_empty());
        assert_eq!(rendered(&set), json!([]));
    }

    #[test]
    fn kinds_render_in_first_use_order() {
        let set = RelationCommandSet::new().link(1).unlink(2).link(3);
        assert_eq!(rendered(&set), json!([[4, 1, 0], [4, 3, 0], [3, 2, 0]]));
        assert_eq!(
            set.commands().collect::<Vec<_>>(),
            vec![RelCommand::Link, RelCommand::Unlink]
        );
    }

    #[test]
    fn remove_all_and_replace_render_once() {
        let set = RelationCommandSet::new()
            .remove_all()
            .replace([1, 2])
            .remove_all()
            .replace(vec![3_i64]);
        assert_eq!(rendered(&set), json!([[5, 0, 0], [6, 0, [1, 2, 3]]]));
    }

    #[test]
    fn nested_relation_inside_added_record() {
        let line = ValueBag::new()
            .put("name", "Line")
            .put("tag_ids", RelationCommandSet::new().link(9));
        let set = RelationCommandSet::new().add(line);
        assert_eq!(
            rendered(&set),
            json!([[0, 0, { "name": "Line", "tag_ids": [[4, 9, 0]] }]])
        );
    }

    #[test]
    fn nested_failure_propagates() {
        let set = RelationCommandSet::new().update(2, ValueBag::new().put("qty", f64::NAN));
        let err = set.render().unwrap_err();
        assert!(matches!(err, WireError::Serialization(_)), "{err}");
    }

    #[test]
    fn serializes_as_rendered_array() {
        let set = RelationCommandSet::new().remove([4, 5]);
        assert_eq!(serde_json::to_string(&set).unwrap(), "[[2,4,0],[2,5,0]]");
    }
}
