mod bag;
mod command;
mod error;
mod id;
mod parse_commands;
mod relation;
mod value;

pub use bag::ValueBag;
pub use bson::{Bson, Document};
pub use command::RelCommand;
pub use error::WireError;
pub use id::{IntoRecordIds, RecordId};
pub use parse_commands::parse_commands;
pub use relation::RelationCommandSet;
pub use value::{FieldValue, bson_to_wire, json_to_bson};
