/// Errors raised while building, encoding or decoding relation payloads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WireError {
    /// An id could not be coerced to the integer wire format.
    #[error("format error: {0}")]
    Format(String),

    /// A value has no representation in the JSON wire payload.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A wire array does not follow the `[tag, id, payload]` layout.
    #[error("parse error: {0}")]
    Parse(String),
}
