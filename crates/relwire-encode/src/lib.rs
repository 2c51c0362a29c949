mod config;
mod error;

use std::fs::File;
use std::io::{self, Read};

use serde_json::{Map, Value};
use tracing::info;

pub use config::EncodeRequest;
pub use error::EncodeError;

/// Read a request document from `reader`.
pub fn load_request(reader: impl Read) -> Result<EncodeRequest, EncodeError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read a request from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_request(path: Option<&str>) -> Result<EncodeRequest, EncodeError> {
    match path {
        None | Some("-") => load_request(io::stdin().lock()),
        Some(path) => load_request(File::open(path)?),
    }
}

/// Build the canonical wire object for a request.
pub fn encode(request: &EncodeRequest) -> Result<Map<String, Value>, EncodeError> {
    let bag = request.to_bag()?;
    let exclude: Vec<&str> = request.exclude.iter().map(String::as_str).collect();
    let object = bag.to_wire(&exclude)?;
    info!(
        fields = object.len(),
        relations = request.relations.len(),
        "encoded payload"
    );
    Ok(object)
}
