//! Normalization of the backend's response shapes.
//!
//! Endpoints answer either with the bare payload or with a `{"data": ...}`
//! envelope, and use `null` when there is nothing to return.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Parse a collection response. `null` (bare or enveloped) is an empty list.
pub fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(body).context("Response is not valid JSON")?;
    match unwrap_envelope(value) {
        Value::Null => Ok(Vec::new()),
        list => serde_json::from_value(list).context("Unexpected shape for list response"),
    }
}

/// Parse a single-object response. `null` means the server has no data.
pub fn parse_object<T: DeserializeOwned>(body: &str) -> Result<Option<T>> {
    let value: Value = serde_json::from_str(body).context("Response is not valid JSON")?;
    match unwrap_envelope(value) {
        Value::Null => Ok(None),
        object => serde_json::from_value(object)
            .map(Some)
            .context("Unexpected shape for object response"),
    }
}
