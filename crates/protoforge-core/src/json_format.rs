//! Conversion between typed messages and plain JSON dictionaries.

use crate::{ForgeError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Convert a message into a JSON dictionary, keeping field names exactly as declared
pub fn message_to_dict<T: Serialize>(message: &T) -> Result<Value> {
    serde_json::to_value(message).map_err(|e| ForgeError::Conversion(e.to_string()))
}

/// Build a message from a JSON dictionary. Keys the message does not
/// declare are ignored.
pub fn parse_dict<T: DeserializeOwned>(dict: Value) -> Result<T> {
    serde_json::from_value(dict).map_err(|e| ForgeError::Conversion(e.to_string()))
}
