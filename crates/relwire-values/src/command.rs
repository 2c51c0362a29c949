use serde::{Deserialize, Serialize};

/// A relation command understood by the remote record API.
///
/// Each command is sent as a `[tag, id, payload]` triple inside the value of
/// a relation field. The doc on each variant shows that triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelCommand {
    /// `[0, 0, values]`: create a record from `values` and attach it.
    Add,
    /// `[1, id, values]`: write `values` on the attached record `id`.
    Update,
    /// `[2, id, 0]`: detach record `id` and delete it.
    Remove,
    /// `[3, id, 0]`: detach record `id` without deleting it.
    Unlink,
    /// `[4, id, 0]`: attach the existing record `id`.
    Link,
    /// `[5, 0, 0]`: detach every record.
    RemoveAll,
    /// `[6, 0, ids]`: replace the attached records with exactly `ids`.
    Replace,
}

impl RelCommand {
    pub const ALL: [RelCommand; 7] = [
        RelCommand::Add,
        RelCommand::Update,
        RelCommand::Remove,
        RelCommand::Unlink,
        RelCommand::Link,
        RelCommand::RemoveAll,
        RelCommand::Replace,
    ];

    /// Numeric tag written in the first slot of the wire triple.
    pub const fn tag(self) -> u8 {
        match self {
            RelCommand::Add => 0,
            RelCommand::Update => 1,
            RelCommand::Remove => 2,
            RelCommand::Unlink => 3,
            RelCommand::Link => 4,
            RelCommand::RemoveAll => 5,
            RelCommand::Replace => 6,
        }
    }

    pub fn from_tag(tag: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| u64::from(c.tag()) == tag)
    }
}
