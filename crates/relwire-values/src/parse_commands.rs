use serde_json::Value;
use tracing::debug;

use crate::bag::ValueBag;
use crate::command::RelCommand;
use crate::error::WireError;
use crate::id::RecordId;
use crate::relation::RelationCommandSet;

/// Decode a wire array of `[tag, id, payload]` triples into a command set.
///
/// Triples of the same kind are merged, so rendering the result yields the
/// canonical form: kinds in first-seen order, one `[5, 0, 0]` and one
/// `[6, 0, ids]` at most.
///
/// - `id` is read for update/remove/unlink/link and ignored otherwise.
/// - add/update payloads must be objects; they become scalar-only bags.
/// - remove/unlink/link/remove-all payloads are ignored.
/// - replace payloads must be arrays of ids.
pub fn parse_commands(value: &Value) -> Result<RelationCommandSet, WireError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(reject(format!("relation value must be an array, got {other}"))),
    };

    let mut set = RelationCommandSet::new();
    for (index, item) in items.iter().enumerate() {
        set = parse_triple(set, item).map_err(|e| at_index(e, index))?;
    }
    Ok(set)
}

fn parse_triple(set: RelationCommandSet, item: &Value) -> Result<RelationCommandSet, WireError> {
    let (tag, id, payload) = match item.as_array().map(Vec::as_slice) {
        Some([tag, id, payload]) => (tag, id, payload),
        Some(other) => {
            return Err(reject(format!(
                "command must have 3 elements, got {}",
                other.len()
            )));
        }
        None => return Err(reject(format!("command must be an array, got {item}"))),
    };

    let command = tag
        .as_u64()
        .and_then(RelCommand::from_tag)
        .ok_or_else(|| reject(format!("unknown command tag: {tag}")))?;

    Ok(match command {
        RelCommand::Add => set.add(parse_values(payload)?),
        RelCommand::Update => set.update(RecordId::try_from(id)?, parse_values(payload)?),
        RelCommand::Remove => set.remove(RecordId::try_from(id)?),
        RelCommand::Unlink => set.unlink(RecordId::try_from(id)?),
        RelCommand::Link => set.link(RecordId::try_from(id)?),
        RelCommand::RemoveAll => set.remove_all(),
        RelCommand::Replace => {
            let ids = match payload {
                Value::Array(ids) => ids
                    .iter()
                    .map(RecordId::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
                other => return Err(reject(format!("replace payload must be an array, got {other}"))),
            };
            set.replace(ids)
        }
    })
}

fn parse_values(payload: &Value) -> Result<ValueBag, WireError> {
    match payload {
        Value::Object(object) => ValueBag::from_wire(object),
        other => Err(reject(format!("record payload must be an object, got {other}"))),
    }
}

fn reject(msg: String) -> WireError {
    debug!(%msg, "rejected relation command");
    WireError::Parse(msg)
}

fn at_index(error: WireError, index: usize) -> WireError {
    match error {
        WireError::Parse(msg) => WireError::Parse(format!("command {index}: {msg}")),
        WireError::Format(msg) => WireError::Format(format!("command {index}: {msg}")),
        other => other,
    }
}
