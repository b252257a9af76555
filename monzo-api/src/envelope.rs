//! Unwrapping of API responses.
//!
//! Most Monzo endpoints wrap their payload in an object with a single key
//! named after the resource, eg. `{"pots": [...]}` or `{"transaction": {...}}`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Parse `raw` as a JSON object and decode the value stored under `key`.
///
/// # Errors
///
/// - [`DecodeError::Malformed`] if `raw` is not a JSON object
/// - [`DecodeError::MissingKey`] if the object has no `key`
/// - [`DecodeError::Shape`] if the value cannot be decoded as a `T`
pub fn decode<T: DeserializeOwned>(raw: &[u8], key: &str) -> Result<T, DecodeError> {
    let mut object: Map<String, Value> =
        serde_json::from_slice(raw).map_err(DecodeError::Malformed)?;

    let value = object
        .remove(key)
        .ok_or_else(|| DecodeError::MissingKey(key.to_string()))?;

    serde_json::from_value(value).map_err(DecodeError::Shape)
}

/// Decode a payload that is not wrapped in an envelope.
///
/// # Errors
///
/// - [`DecodeError::Malformed`] if `raw` is not valid JSON
/// - [`DecodeError::Shape`] if the document cannot be decoded as a `T`
pub fn decode_unwrapped<T: DeserializeOwned>(raw: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(raw).map_err(|e| {
        if e.is_syntax() || e.is_eof() {
            DecodeError::Malformed(e)
        } else {
            DecodeError::Shape(e)
        }
    })
}
