//! Lenient field decoders for service payloads.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::{Coordinates, LocationKind};

/// Decodes a `[lat, lng]` pair, yielding `None` for anything other than
/// two finite numbers (null, wrong length, strings, ...).
pub fn lenient_pair<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    let Some(serde_json::Value::Array(items)) = value else {
        return Ok(None);
    };

    let [lat, lng] = items.as_slice() else {
        return Ok(None);
    };

    Ok(Coordinates::from_parts(lat.as_f64(), lng.as_f64()))
}

/// Decodes a node type, mapping missing, null and unknown names to
/// [`LocationKind::Other`].
pub fn lenient_kind<'de, D>(deserializer: D) -> Result<LocationKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| LocationKind::from_str(s).ok())
        .unwrap_or_default())
}

/// Decodes an optional string, treating null and non-string values as
/// absent.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Decodes a required string, mapping null and non-string values to `""`.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Decodes a list of strings. Null or a non-array yields an empty list;
/// non-string items are dropped.
pub fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    let Some(serde_json::Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// Decodes an optional nested object, yielding `None` when it does not
/// have the expected shape instead of failing the enclosing payload.
pub fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::warn!("Ignoring malformed nested payload: {e}");
            None
        }
    }))
}
