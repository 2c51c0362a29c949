use std::fmt;
use std::str::FromStr;

use bson::Bson;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WireError;

/// Integer id of a remote record.
///
/// `RecordId::NEW` (0) marks "no id": create commands and the unused id slot
/// of `[5, 0, 0]` / `[6, 0, ids]` carry it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub const NEW: RecordId = RecordId(0);

    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    fn from_f64(f: f64) -> Result<Self, WireError> {
        // i64::MAX is not representable as f64; the rounded bound is exclusive.
        if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Ok(Self(f as i64))
        } else {
            Err(WireError::Format(format!("record id must be an integer, got {f}")))
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self(i64::from(id))
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::from(id.0)
    }
}

impl FromStr for RecordId {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, WireError> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| WireError::Format(format!("invalid record id {s:?}: {e}")))
    }
}

impl TryFrom<&Value> for RecordId {
    type Error = WireError;

    fn try_from(value: &Value) -> Result<Self, WireError> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(id) => Ok(Self(id)),
                None => match n.as_f64() {
                    Some(f) if !n.is_u64() => Self::from_f64(f),
                    _ => Err(WireError::Format(format!("record id out of range: {n}"))),
                },
            },
            Value::String(s) => s.parse(),
            other => Err(WireError::Format(format!(
                "record id must be an integer, got {other}"
            ))),
        }
    }
}

impl TryFrom<&Bson> for RecordId {
    type Error = WireError;

    fn try_from(value: &Bson) -> Result<Self, WireError> {
        match value {
            Bson::Int32(id) => Ok(Self(i64::from(*id))),
            Bson::Int64(id) => Ok(Self(*id)),
            Bson::Double(f) => Self::from_f64(*f),
            Bson::String(s) => s.parse(),
            other => Err(WireError::Format(format!(
                "record id must be an integer, got {:?}",
                other.element_type()
            ))),
        }
    }
}

/// Types that name one or more record ids.
///
/// Lets `link`, `unlink`, `remove` and `replace` take a single id or a
/// collection of them.
pub trait IntoRecordIds {
    fn into_record_ids(self) -> Vec<RecordId>;
}

macro_rules! single_id {
    ($($ty:ty),*) => {
        $(
            impl IntoRecordIds for $ty {
                fn into_record_ids(self) -> Vec<RecordId> {
                    vec![RecordId::from(self)]
                }
            }
        )*
    };
}

single_id!(RecordId, i64, i32, u32);

impl<T: Into<RecordId>> IntoRecordIds for Vec<T> {
    fn into_record_ids(self) -> Vec<RecordId> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<RecordId>, const N: usize> IntoRecordIds for [T; N] {
    fn into_record_ids(self) -> Vec<RecordId> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<RecordId> + Copy> IntoRecordIds for &[T] {
    fn into_record_ids(self) -> Vec<RecordId> {
        self.iter().copied().map(Into::into).collect()
    }
}
