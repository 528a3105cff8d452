//! Canonical JSON/YAML helpers and stable digests.

use std::collections::BTreeMap;
use std::iter::FromIterator;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, PcgError};

fn serde_error(code: &str, err: impl ToString) -> PcgError {
    PcgError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with deterministic key ordering.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, PcgError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-serialize", err))?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical).map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Deserializes a YAML document into the requested type.
pub fn from_yaml_str<T: DeserializeOwned>(data: &str) -> Result<T, PcgError> {
    serde_yaml::from_str(data).map_err(|err| serde_error("yaml-deserialize", err))
}

/// Hex encoded SHA-256 digest of raw bytes.
pub fn stable_hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Computes a stable hexadecimal hash for the provided serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, PcgError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(stable_hash_bytes(&bytes))
}
