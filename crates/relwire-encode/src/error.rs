use relwire_values::WireError;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Wire(#[from] WireError),
}
